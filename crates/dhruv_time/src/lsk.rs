//! NAIF Leapseconds Kernel (LSK) text format parser.
//!
//! LSK files are NAIF "KPL/LSK" text kernels. The only assignments this
//! engine needs are `DELTET/DELTA_T_A`, `DELTET/K`, `DELTET/EB`,
//! `DELTET/M`, and the `DELTET/DELTA_AT` leap-second table, which is a
//! flat array of alternating `(delta_seconds, year, month, day)` tuples,
//! e.g.:
//!
//! ```text
//! DELTET/DELTA_AT = ( 10, @1972-JAN-1
//!                      11, @1972-JUL-1
//!                      ...
//!                      37, @2017-JAN-1 )
//! ```

use crate::error::TimeError;
use crate::julian::{calendar_to_jd, month_from_abbrev};

/// Parsed leapseconds kernel data.
#[derive(Debug, Clone)]
pub struct LskData {
    /// `(leap_seconds, effective_jd_utc)` pairs, in ascending date order.
    pub leap_seconds: Vec<(f64, f64)>,
    /// `DELTET/DELTA_T_A`: TDB-TAI offset at J2000.0, seconds (default 32.184).
    pub delta_t_a: f64,
    /// `DELTET/K`: amplitude of the periodic TDB-TT term, seconds.
    pub k: f64,
    /// `DELTET/EB`: eccentricity of Earth's orbit used in the periodic term.
    pub eb: f64,
    /// `DELTET/M`: `(M0, M1)` linear mean-anomaly coefficients, radians and radians/sec.
    pub m: (f64, f64),
}

impl Default for LskData {
    fn default() -> Self {
        LskData {
            leap_seconds: Vec::new(),
            delta_t_a: 32.184,
            k: 1.657e-3,
            eb: 1.671e-2,
            m: (6.239_996, 1.990_968_71e-7),
        }
    }
}

/// Parse LSK text content into [`LskData`].
pub fn parse_lsk(content: &str) -> Result<LskData, TimeError> {
    let mut data = LskData {
        leap_seconds: Vec::new(),
        delta_t_a: 32.184,
        k: 1.657e-3,
        eb: 1.671e-2,
        m: (6.239_996, 1.99096871e-7),
    };

    // Strip comment blocks delimited by \begintext ... \begindata (NAIF convention).
    let mut in_data = false;
    let mut buf = String::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("\\begindata") {
            in_data = true;
            continue;
        }
        if trimmed.starts_with("\\begintext") {
            in_data = false;
            continue;
        }
        if in_data {
            buf.push_str(line);
            buf.push('\n');
        }
    }
    if buf.is_empty() {
        // No \begindata markers found; treat the whole file as data (lenient).
        buf = content.to_string();
    }

    parse_delta_at(&buf, &mut data)?;
    parse_scalar_assignment(&buf, "DELTET/DELTA_T_A", &mut data.delta_t_a);
    parse_scalar_assignment(&buf, "DELTET/K", &mut data.k);
    parse_scalar_assignment(&buf, "DELTET/EB", &mut data.eb);

    if data.leap_seconds.is_empty() {
        return Err(TimeError::LskParse(
            "no DELTET/DELTA_AT leap-second entries found".into(),
        ));
    }
    data.leap_seconds
        .sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());

    Ok(data)
}

fn parse_scalar_assignment(buf: &str, key: &str, out: &mut f64) {
    if let Some(pos) = buf.find(key) {
        let rest = &buf[pos + key.len()..];
        if let Some(eq) = rest.find('=') {
            let value_str = rest[eq + 1..]
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '+')
                .collect::<String>();
            if let Ok(v) = value_str.trim().parse::<f64>() {
                *out = v;
            }
        }
    }
}

fn parse_delta_at(buf: &str, data: &mut LskData) -> Result<(), TimeError> {
    let key = "DELTET/DELTA_AT";
    let Some(key_pos) = buf.find(key) else {
        return Ok(());
    };
    let rest = &buf[key_pos + key.len()..];
    let Some(open) = rest.find('(') else {
        return Err(TimeError::LskParse(
            "DELTET/DELTA_AT missing opening paren".into(),
        ));
    };
    let Some(close) = rest.find(')') else {
        return Err(TimeError::LskParse(
            "DELTET/DELTA_AT missing closing paren".into(),
        ));
    };
    let body = &rest[open + 1..close];

    // Tokens look like: 10, @1972-JAN-1  11, @1972-JUL-1  ...
    let tokens: Vec<&str> = body
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    let mut i = 0;
    while i + 1 < tokens.len() {
        let delta: f64 = tokens[i]
            .parse()
            .map_err(|_| TimeError::LskParse(format!("bad leap-second value: {}", tokens[i])))?;
        let date_tok = tokens[i + 1].trim_start_matches('@');
        let jd = parse_naif_date(date_tok)?;
        data.leap_seconds.push((delta, jd));
        i += 2;
    }

    Ok(())
}

/// Parse a NAIF-style date token, e.g. "1972-JAN-1" into a Julian Date (UTC, midnight).
fn parse_naif_date(tok: &str) -> Result<f64, TimeError> {
    let parts: Vec<&str> = tok.split('-').collect();
    if parts.len() != 3 {
        return Err(TimeError::LskParse(format!("bad date token: {tok}")));
    }
    let year: i32 = parts[0]
        .parse()
        .map_err(|_| TimeError::LskParse(format!("bad year in: {tok}")))?;
    let month = month_from_abbrev(parts[1])
        .ok_or_else(|| TimeError::LskParse(format!("bad month in: {tok}")))?;
    let day: f64 = parts[2]
        .parse()
        .map_err(|_| TimeError::LskParse(format!("bad day in: {tok}")))?;

    Ok(calendar_to_jd(year, month, day))
}
