use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{named, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Fixed palettes
// ---------------------------------------------------------------------------

/// Plotly's qualitative palette, cycled over the sorted departments.
const QUALITATIVE: [Srgb<u8>; 10] = [
    Srgb::new(0x63, 0x6e, 0xfa),
    Srgb::new(0xef, 0x55, 0x3b),
    Srgb::new(0x00, 0xcc, 0x96),
    Srgb::new(0xab, 0x63, 0xfa),
    Srgb::new(0xff, 0xa1, 0x5a),
    Srgb::new(0x19, 0xd3, 0xf3),
    Srgb::new(0xff, 0x66, 0x92),
    Srgb::new(0xb6, 0xe8, 0x80),
    Srgb::new(0xff, 0x97, 0xff),
    Srgb::new(0xfe, 0xcb, 0x52),
];

/// Viridis colour stops, dark to bright.
const VIRIDIS: [Srgb<u8>; 10] = [
    Srgb::new(0x44, 0x01, 0x54),
    Srgb::new(0x48, 0x28, 0x78),
    Srgb::new(0x3e, 0x49, 0x89),
    Srgb::new(0x31, 0x68, 0x8e),
    Srgb::new(0x26, 0x82, 0x8e),
    Srgb::new(0x1f, 0x9e, 0x89),
    Srgb::new(0x35, 0xb7, 0x79),
    Srgb::new(0x6e, 0xce, 0x58),
    Srgb::new(0xb5, 0xde, 0x2b),
    Srgb::new(0xfd, 0xe7, 0x25),
];

pub fn to_color32(c: Srgb<u8>) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

/// Line colour for a named series; white for anything unknown.
pub fn series_color(name: &str) -> Color32 {
    let c = match name {
        "Task_Duration" => named::LIME,
        "Project_Completion_Times" => named::FUCHSIA,
        "Work_Tool_Hours" => named::YELLOW,
        "Downtime" => named::RED,
        _ => named::WHITE,
    };
    to_color32(c)
}

/// Sample the Viridis scale at `t` in `0.0..=1.0`, interpolating in linear RGB.
pub fn viridis(t: f64) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let lo = scaled.floor() as usize;
    let hi = (lo + 1).min(VIRIDIS.len() - 1);
    let frac = (scaled - lo as f64) as f32;

    let a: LinSrgb = VIRIDIS[lo].into_format::<f32>().into_linear();
    let b: LinSrgb = VIRIDIS[hi].into_format::<f32>().into_linear();
    let mixed: Srgb = Srgb::from_linear(a.mix(b, frac));
    to_color32(mixed.into_format::<u8>())
}

// ---------------------------------------------------------------------------
// Department colours
// ---------------------------------------------------------------------------

/// Maps departments to distinct colours, shared by the bar and scatter charts.
#[derive(Debug, Clone)]
pub struct DepartmentColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl DepartmentColors {
    /// Assign palette colours by position in the (sorted) department list.
    pub fn new(departments: &[String]) -> Self {
        let mapping = departments
            .iter()
            .zip(QUALITATIVE.iter().cycle())
            .map(|(dept, c)| (dept.clone(), to_color32(*c)))
            .collect();

        DepartmentColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, department: Option<&str>) -> Color32 {
        department
            .and_then(|d| self.mapping.get(d))
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Legend entries (department → colour) for the UI.
    pub fn legend_entries(&self) -> impl Iterator<Item = (&str, Color32)> + '_ {
        self.mapping.iter().map(|(d, c)| (d.as_str(), *c))
    }
}
