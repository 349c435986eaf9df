use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::data::filter::FilterSelection;

/// Environment variable consulted when no workbook path is given.
pub const WORKBOOK_ENV: &str = "DASHBOARD_WORKBOOK";

pub const USAGE: &str = "\
usage: remote-work-dashboard [WORKBOOK] [--export FILE.json] [--department NAME]... [--year YEAR]...

  WORKBOOK           .xlsx/.xls/.ods, .json, or a directory of per-sheet files
                     (defaults to $DASHBOARD_WORKBOOK, then a file dialog)
  --export FILE      write the dashboard bundle as JSON and exit
  --department NAME  initial department filter (repeatable)
  --year YEAR        initial year filter (repeatable)";

/// Startup options resolved from the command line and environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardConfig {
    pub workbook: Option<PathBuf>,
    pub export: Option<PathBuf>,
    pub selection: FilterSelection,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::parse(std::env::args().skip(1))?;
        if config.workbook.is_none() {
            config.workbook = std::env::var_os(WORKBOOK_ENV).map(PathBuf::from);
        }
        Ok(config)
    }

    /// Parse arguments (without the program name).
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut config = DashboardConfig::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .with_context(|| format!("{flag} needs a value\n\n{USAGE}"))
            };
            match arg.as_str() {
                "--export" => config.export = Some(PathBuf::from(value("--export")?)),
                "--department" => {
                    config.selection.departments.insert(value("--department")?);
                }
                "--year" => {
                    let raw = value("--year")?;
                    let year = raw
                        .parse::<i64>()
                        .with_context(|| format!("--year expects an integer, got '{raw}'"))?;
                    config.selection.years.insert(year);
                }
                "-h" | "--help" => bail!("{USAGE}"),
                flag if flag.starts_with('-') => bail!("unknown option '{flag}'\n\n{USAGE}"),
                path => {
                    if config.workbook.is_some() {
                        bail!("more than one workbook given\n\n{USAGE}");
                    }
                    config.workbook = Some(PathBuf::from(path));
                }
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<DashboardConfig> {
        DashboardConfig::parse(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn no_arguments_means_no_workbook_and_no_filters() {
        let config = parse(&[]).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn parses_workbook_export_and_filters() {
        let config = parse(&[
            "data.xlsx",
            "--department",
            "HR",
            "--year",
            "2022",
            "--department",
            "Eng",
            "--export",
            "out.json",
        ])
        .unwrap();

        assert_eq!(config.workbook, Some(PathBuf::from("data.xlsx")));
        assert_eq!(config.export, Some(PathBuf::from("out.json")));
        assert_eq!(config.selection.departments.len(), 2);
        assert!(config.selection.years.contains(&2022));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&["--year", "twenty"]).is_err());
        assert!(parse(&["--export"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["a.xlsx", "b.xlsx"]).is_err());
    }
}
