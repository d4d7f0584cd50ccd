//! Named historical DST schemes a [`crate::patch_rules::HistoricalPatchRule`]
//! may reference in its `dst_rules` field.

use chrono::{Datelike, NaiveDate, Weekday};

/// A named historical DST scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DstScheme {
    /// No DST ever observed.
    None,
    /// Last Sunday of April through last Sunday of October, for the given
    /// year (the convention used broadly across the US prior to the 1986
    /// shift to the first Sunday of April, and again distinct from the
    /// post-2007 Energy Policy Act rules).
    UsStandard,
    /// Same rule as [`DstScheme::UsStandard`]; named separately because the
    /// source rule files that motivate this distinguish Chicago-area
    /// historical practice by name even though the computed rule is
    /// presently identical.
    ChicagoHistorical,
}

impl DstScheme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Self::None),
            "us_standard" => Some(Self::UsStandard),
            "chicago_historical" => Some(Self::ChicagoHistorical),
            _ => None,
        }
    }

    /// Whether `date` falls within this scheme's DST window for its year.
    pub fn is_dst(&self, date: NaiveDate) -> bool {
        match self {
            Self::None => false,
            Self::UsStandard | Self::ChicagoHistorical => {
                let year = date.year();
                let start = last_sunday_of(year, 4);
                let end = last_sunday_of(year, 10);
                date >= start && date < end
            }
        }
    }
}

/// The last Sunday of `month` in `year`.
fn last_sunday_of(year: i32, month: u32) -> NaiveDate {
    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
    };
    let mut day = next_month_first.pred_opt().unwrap();
    while day.weekday() != Weekday::Sun {
        day = day.pred_opt().unwrap();
    }
    day
}
