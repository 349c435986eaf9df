use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Write `value` as pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value).context("serializing dashboard bundle")?;
    std::fs::write(path, s).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilterSelection;
    use crate::data::model::DatasetStore;
    use crate::pipeline::recompute;

    #[test]
    fn writes_an_empty_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        let bundle = recompute(&DatasetStore::default(), &FilterSelection::default());

        write_json(&path, &bundle).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["metrics"]["total_employees"], 0);
        assert_eq!(written["cards"]["avg_satisfaction"], "0");
        assert_eq!(written["charts"]["communication"], serde_json::json!([]));
    }
}
