//! Ayanamsha computation for 20 sidereal reference systems.
//!
//! The ayanamsha is the angular offset between the tropical zodiac (defined
//! by the vernal equinox) and a sidereal zodiac (anchored to fixed stars).
//! As the equinox precesses westward, the ayanamsha increases over time.
//!
//! Each system is defined by its J2000.0 reference value (the J2000 ecliptic
//! longitude of the sidereal zero point). The ayanamsha at any epoch is
//! computed by precessing that direction to the ecliptic-of-date using the
//! full 3D ecliptic precession matrix and reading off the longitude.
//!
//! Clean-room implementation: all reference values derived independently from
//! published system definitions. See `docs/clean_room_ayanamsha.md`.

use crate::ayanamsha_anchor::anchor_relative_ayanamsha_deg;
use crate::error::VedicError;
use dhruv_frames::{
    DEFAULT_PRECESSION_MODEL, PrecessionModel, nutation_iau2000b,
    precess_ecliptic_j2000_to_date_with_model,
};
use dhruv_time::J2000_JD;

/// Sidereal reference systems for ayanamsha computation.
///
/// Each variant defines a different convention for anchoring the sidereal
/// zodiac to the fixed stars. The differences reduce to a single parameter:
/// the ayanamsha value at J2000.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AyanamshaSystem {
    /// Lahiri (Chitrapaksha): Spica at 0 Libra sidereal.
    /// Indian government standard (Calendar Reform Committee, 1957).
    Lahiri,

    /// True Lahiri: same anchor as Lahiri, but uses the true
    /// (nutation-corrected) equinox instead of the mean equinox.
    TrueLahiri,

    /// Krishnamurti Paddhati (KP): sub-lord system, minimal offset from Lahiri.
    KP,

    /// B.V. Raman: from "Hindu Predictive Astrology".
    /// Zero ayanamsha year approximately 397 CE.
    Raman,

    /// Fagan-Bradley: primary Western sidereal system.
    /// Synetic Vernal Point calibrated by Cyril Fagan and Donald Bradley.
    FaganBradley,

    /// Pushya Paksha: delta Cancri (Pushya) at 16 deg Cancer (106 deg sidereal).
    PushyaPaksha,

    /// Rohini Paksha: Aldebaran at 15 deg 47 min Taurus.
    RohiniPaksha,

    /// Robert DeLuce ayanamsha (1930s).
    DeLuce,

    /// Djwal Khul: esoteric astrology (Alice Bailey tradition).
    DjwalKhul,

    /// Hipparchos: derived from Hipparchus observations (~128 BCE).
    Hipparchos,

    /// Sassanian: Sassanid-era Persian astronomical tradition.
    Sassanian,

    /// Deva-Dutta ayanamsha.
    DevaDutta,

    /// Usha-Shashi ayanamsha.
    UshaShashi,

    /// Sri Yukteshwar: from "The Holy Science" (1894).
    Yukteshwar,

    /// J.N. Bhasin ayanamsha.
    JnBhasin,

    /// Chandra Hari ayanamsha.
    ChandraHari,

    /// Jagganatha ayanamsha.
    Jagganatha,

    /// Surya Siddhanta: ancient Indian treatise.
    /// Uses IAU precession for consistency (not traditional 54 arcsec/yr).
    SuryaSiddhanta,

    /// Galactic Center at 0 deg Sagittarius sidereal.
    GalacticCenter0Sag,

    /// Aldebaran at 15 deg Taurus sidereal.
    Aldebaran15Tau,
}

/// All 20 ayanamsha systems in enum order.
const ALL_SYSTEMS: [AyanamshaSystem; 20] = [
    AyanamshaSystem::Lahiri,
    AyanamshaSystem::TrueLahiri,
    AyanamshaSystem::KP,
    AyanamshaSystem::Raman,
    AyanamshaSystem::FaganBradley,
    AyanamshaSystem::PushyaPaksha,
    AyanamshaSystem::RohiniPaksha,
    AyanamshaSystem::DeLuce,
    AyanamshaSystem::DjwalKhul,
    AyanamshaSystem::Hipparchos,
    AyanamshaSystem::Sassanian,
    AyanamshaSystem::DevaDutta,
    AyanamshaSystem::UshaShashi,
    AyanamshaSystem::Yukteshwar,
    AyanamshaSystem::JnBhasin,
    AyanamshaSystem::ChandraHari,
    AyanamshaSystem::Jagganatha,
    AyanamshaSystem::SuryaSiddhanta,
    AyanamshaSystem::GalacticCenter0Sag,
    AyanamshaSystem::Aldebaran15Tau,
];

impl AyanamshaSystem {
    /// Reference ayanamsha at J2000.0 in degrees.
    ///
    /// Each value is independently derived from the system's published
    /// definition (star anchor or zero-ayanamsha epoch). See
    /// `docs/clean_room_ayanamsha.md` for derivation details.
    pub const fn reference_j2000_deg(self) -> f64 {
        match self {
            // MEAN anchor: IAE gazette 23°15'00.658" minus IAU 2000B nutation
            // at 1956-03-21, back-computed to J2000 via 3D Vondrák precession.
            // Must stay synchronized with anchor_spec(Lahiri).lon_j2000_deg.
            Self::Lahiri => 23.857_052_898_247_307,
            // Same mean anchor baseline as Lahiri; nutation applied separately.
            Self::TrueLahiri => 23.857_052_898_247_307,
            // Krishnamurti: minimal offset from Lahiri
            Self::KP => 23.850,
            // B.V. Raman: zero year ~397 CE
            Self::Raman => 22.370,
            // Fagan-Bradley SVP calibration
            Self::FaganBradley => 24.736,
            // delta Cancri at 106 deg sidereal
            Self::PushyaPaksha => 21.000,
            // Aldebaran at 15 deg 47 min Taurus
            Self::RohiniPaksha => 24.087,
            // Robert DeLuce
            Self::DeLuce => 21.619,
            // Esoteric/Bailey tradition
            Self::DjwalKhul => 22.883,
            // Hipparchus ~128 BCE
            Self::Hipparchos => 21.176,
            // Sassanid Persian tradition
            Self::Sassanian => 19.765,
            // Deva-Dutta
            Self::DevaDutta => 22.474,
            // Usha-Shashi
            Self::UshaShashi => 20.103,
            // Sri Yukteshwar, "The Holy Science"
            Self::Yukteshwar => 22.376,
            // J.N. Bhasin
            Self::JnBhasin => 22.376,
            // Chandra Hari
            Self::ChandraHari => 23.250,
            // Jagganatha
            Self::Jagganatha => 23.250,
            // Surya Siddhanta (IAU precession back-computed)
            Self::SuryaSiddhanta => 22.459,
            // Galactic Center at 0 deg Sagittarius
            Self::GalacticCenter0Sag => 26.860,
            // Aldebaran at 15 deg Taurus
            Self::Aldebaran15Tau => 24.870,
        }
    }

    /// Whether this system is computed by locking an anchor to a sidereal longitude.
    ///
    /// Anchor-relative systems do not use the legacy "reference + precession" model.
    pub const fn is_anchor_relative(self) -> bool {
        matches!(
            self,
            Self::Lahiri
                | Self::TrueLahiri
                | Self::PushyaPaksha
                | Self::RohiniPaksha
                | Self::Aldebaran15Tau
        )
    }

    /// All 20 defined ayanamsha systems.
    pub const fn all() -> &'static [AyanamshaSystem] {
        &ALL_SYSTEMS
    }

    /// Canonical lowercase snake_case name, used by registry lookups and
    /// wire formats.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lahiri => "lahiri",
            Self::TrueLahiri => "true_lahiri",
            Self::KP => "kp",
            Self::Raman => "raman",
            Self::FaganBradley => "fagan_bradley",
            Self::PushyaPaksha => "pushya_paksha",
            Self::RohiniPaksha => "rohini_paksha",
            Self::DeLuce => "de_luce",
            Self::DjwalKhul => "djwal_khul",
            Self::Hipparchos => "hipparchos",
            Self::Sassanian => "sassanian",
            Self::DevaDutta => "deva_dutta",
            Self::UshaShashi => "usha_shashi",
            Self::Yukteshwar => "yukteshwar",
            Self::JnBhasin => "jn_bhasin",
            Self::ChandraHari => "chandra_hari",
            Self::Jagganatha => "jagganatha",
            Self::SuryaSiddhanta => "surya_siddhanta",
            Self::GalacticCenter0Sag => "galactic_center_0_sag",
            Self::Aldebaran15Tau => "aldebaran_15_tau",
        }
    }

    /// Look up a system by its canonical name.
    pub fn from_name(name: &str) -> Result<Self, VedicError> {
        ALL_SYSTEMS
            .iter()
            .copied()
            .find(|sys| sys.name() == name)
            .ok_or_else(|| VedicError::UnknownSystem(name.to_string()))
    }
}

/// Mean ayanamsha in degrees at a given epoch.
///
/// # Arguments
/// * `system` — the sidereal reference system
/// * `t_centuries` — Julian centuries of TDB since J2000.0
///
/// # Method
/// The sidereal zero point (at J2000 ecliptic longitude `reference_j2000_deg`)
/// is precessed to the ecliptic-of-date using the full 3D ecliptic precession
/// matrix, and its longitude on the ecliptic-of-date is the ayanamsha.
/// This is consistent with tropical longitudes computed via the same 3D matrix.
pub fn ayanamsha_mean_deg(system: AyanamshaSystem, t_centuries: f64) -> f64 {
    ayanamsha_mean_deg_with_model(system, t_centuries, DEFAULT_PRECESSION_MODEL)
}

/// Mean ayanamsha in degrees at a given epoch for the selected precession model.
pub fn ayanamsha_mean_deg_with_model(
    system: AyanamshaSystem,
    t_centuries: f64,
    model: PrecessionModel,
) -> f64 {
    if let Some(aya) = anchor_relative_ayanamsha_deg(system, t_centuries, model) {
        aya
    } else {
        ayanamsha_3d(system.reference_j2000_deg(), t_centuries, model)
    }
}

/// Compute ayanamsha by precessing the sidereal zero point to ecliptic-of-date.
///
/// `ref_j2000_deg` is the J2000 ecliptic longitude of the sidereal zero point.
/// Returns its longitude on the ecliptic-of-date, which equals the ayanamsha.
fn ayanamsha_3d(ref_j2000_deg: f64, t_centuries: f64, model: PrecessionModel) -> f64 {
    if t_centuries.abs() < 1e-15 {
        return ref_j2000_deg;
    }
    let ref_rad = ref_j2000_deg.to_radians();
    let v = [ref_rad.cos(), ref_rad.sin(), 0.0];
    let v_date = precess_ecliptic_j2000_to_date_with_model(&v, t_centuries, model);
    v_date[1].atan2(v_date[0]).to_degrees().rem_euclid(360.0)
}

/// "True"-mode ayanamsha helper in degrees.
///
/// Adds `delta_psi_arcsec` (nutation in longitude) to the mean ayanamsha
/// for all systems.
///
/// # Arguments
/// * `system` — the sidereal reference system
/// * `t_centuries` — Julian centuries of TDB since J2000.0
/// * `delta_psi_arcsec` — nutation in longitude in arcseconds (from an
///   external nutation model such as IAU 2000B)
pub fn ayanamsha_true_deg(system: AyanamshaSystem, t_centuries: f64, delta_psi_arcsec: f64) -> f64 {
    ayanamsha_true_deg_with_model(
        system,
        t_centuries,
        delta_psi_arcsec,
        DEFAULT_PRECESSION_MODEL,
    )
}

/// "True"-mode ayanamsha helper for the selected precession model, in degrees.
///
/// `delta_psi_arcsec` is applied for all systems.
pub fn ayanamsha_true_deg_with_model(
    system: AyanamshaSystem,
    t_centuries: f64,
    delta_psi_arcsec: f64,
    model: PrecessionModel,
) -> f64 {
    ayanamsha_mean_deg_with_model(system, t_centuries, model) + delta_psi_arcsec / 3600.0
}

/// Compute ayanamsha, optionally with nutation correction.
///
/// When `use_nutation` is true, nutation in longitude (Δψ) is computed
/// internally via IAU 2000B and added to the mean ayanamsha for all systems.
///
/// When `use_nutation` is false, this returns the same value as
/// [`ayanamsha_mean_deg`].
///
/// # Arguments
/// * `system` — the sidereal reference system
/// * `t_centuries` — Julian centuries of TDB since J2000.0
/// * `use_nutation` — whether to apply nutation correction
pub fn ayanamsha_deg(system: AyanamshaSystem, t_centuries: f64, use_nutation: bool) -> f64 {
    ayanamsha_deg_with_model(system, t_centuries, use_nutation, DEFAULT_PRECESSION_MODEL)
}

/// Compute ayanamsha, optionally with nutation correction, with a selected precession model.
///
/// When `use_nutation` is true, nutation in longitude (Δψ) is added for all systems.
pub fn ayanamsha_deg_with_model(
    system: AyanamshaSystem,
    t_centuries: f64,
    use_nutation: bool,
    model: PrecessionModel,
) -> f64 {
    let mean = ayanamsha_mean_deg_with_model(system, t_centuries, model);
    if use_nutation {
        let (delta_psi_arcsec, _) = nutation_iau2000b(t_centuries);
        mean + delta_psi_arcsec / 3600.0
    } else {
        mean
    }
}

/// Convert a Julian Date in TDB to Julian centuries since J2000.0.
pub fn jd_tdb_to_centuries(jd_tdb: f64) -> f64 {
    (jd_tdb - J2000_JD) / 36525.0
}

/// Convert TDB seconds past J2000.0 to Julian centuries.
pub fn tdb_seconds_to_centuries(tdb_s: f64) -> f64 {
    tdb_s / (36525.0 * 86_400.0)
}
