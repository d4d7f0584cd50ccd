use thiserror::Error;

/// Errors raised while resolving a local civil datetime to UTC.
#[derive(Debug, Error, PartialEq)]
pub enum TimeResolverError {
    #[error("civil datetime year {year} is outside the supported range [1000, 3000]")]
    YearOutOfRange { year: i32 },

    #[error("local datetime must not carry a timezone suffix: {0}")]
    UnexpectedTimezoneSuffix(String),

    #[error("could not parse local datetime: {0}")]
    UnparseableDatetime(String),

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("unknown fixed-offset zone abbreviation: {0}")]
    UnknownAbbreviation(String),

    #[error("invalid historical patch rules file: {0}")]
    InvalidPatchFile(String),
}
