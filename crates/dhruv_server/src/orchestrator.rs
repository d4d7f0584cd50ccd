//! The Request Orchestrator (§4.E): validate → resolve time → fingerprint →
//! cache → single-flight → dispatch to the worker pool → post-process →
//! assemble → cache insert.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Datelike, Timelike, Utc};
use dhruv_core::{Frame as EngineFrame, Observer, Query};
use dhruv_timezone::ParityProfile;
use tracing::{info, warn};

use crate::cache::CacheLookup;
use crate::domain::{
    self, AyanamshaProvenance, Dms, EpochKind, FrameType, PositionResultDto, PositionsRequest,
    PositionsResponse, Provenance, WhenSpec,
};
use crate::error::{map_engine_error, ApiError};
use crate::fingerprint;
use crate::singleflight::{SharedResult, Slot};
use crate::state::AppState;
use crate::timeresolve::TimeResolutionDto;

pub struct PositionsOutcome {
    pub body: Vec<u8>,
    pub etag: String,
    pub cache: &'static str,
}

pub async fn handle_positions(
    state: &Arc<AppState>,
    req: PositionsRequest,
) -> Result<PositionsOutcome, ApiError> {
    let validated = domain::validate(&req)?;

    let default_profile = ParityProfile::from_name(&state.config.time.parity_profile_default)
        .unwrap_or(ParityProfile::StrictHistory);
    let parity_profile = req
        .parity_profile
        .as_deref()
        .and_then(ParityProfile::from_name)
        .unwrap_or(default_profile);

    let (utc, time_resolver_dto) = resolve_when(state, &req.when, parity_profile)?;

    let system_tag = match req.system {
        domain::ZodiacSystem::Tropical => "tropical",
        domain::ZodiacSystem::Sidereal => "sidereal",
    };
    let ayanamsha_id = req.ayanamsha.as_ref().map(|a| a.id.as_str());

    let fp = fingerprint::compute(
        utc,
        system_tag,
        ayanamsha_id,
        validated.frame,
        validated.epoch,
        &validated.bodies,
    );

    if let CacheLookup::Hit(entry) = state.cache.lookup(&fp, &state.metrics).await {
        return Ok(PositionsOutcome { body: entry.value, etag: entry.etag, cache: "hit" });
    }

    match state.in_flight.register(&fp) {
        Slot::Leader(mut rx) => {
            let task_state = Arc::clone(state);
            let req_bodies = validated.bodies.clone();
            let frame = validated.frame;
            let epoch = validated.epoch;
            let task_ayanamsha_id = ayanamsha_id.map(str::to_string);
            let fp_leader = fp.clone();

            tokio::spawn(async move {
                let outcome = compute_and_assemble(
                    &task_state,
                    utc,
                    frame,
                    epoch,
                    &req_bodies,
                    task_ayanamsha_id.as_deref(),
                    time_resolver_dto,
                    &fp_leader,
                )
                .await;

                match outcome {
                    Ok(bytes) => {
                        task_state.cache.insert(fp_leader.clone(), bytes.clone(), &task_state.metrics).await;
                        task_state.in_flight.complete(&fp_leader, SharedResult::Ok(Arc::new(bytes)));
                    }
                    Err(e) => {
                        warn!(error = %e, fingerprint = %fp_leader, "positions computation failed");
                        task_state.in_flight.complete(&fp_leader, SharedResult::Failed(e));
                    }
                }
            });

            await_outcome(&mut rx, state.request_deadline, &fp).await
        }
        Slot::Follower(mut rx) => await_outcome(&mut rx, state.request_deadline, &fp).await,
    }
}

async fn await_outcome(
    rx: &mut tokio::sync::broadcast::Receiver<SharedResult<Vec<u8>>>,
    deadline: Duration,
    fp: &str,
) -> Result<PositionsOutcome, ApiError> {
    match tokio::time::timeout(deadline, rx.recv()).await {
        Ok(Ok(SharedResult::Ok(bytes))) => {
            Ok(PositionsOutcome { body: (*bytes).clone(), etag: fp.to_string(), cache: "miss" })
        }
        Ok(Ok(SharedResult::Failed(err))) => Err(err),
        Ok(Err(_)) => Err(ApiError::ComputeWorkerFault),
        Err(_) => Err(ApiError::ServiceTimeout),
    }
}

fn resolve_when(
    state: &AppState,
    when: &WhenSpec,
    parity_profile: ParityProfile,
) -> Result<(DateTime<Utc>, Option<TimeResolutionDto>), ApiError> {
    match when {
        WhenSpec::Utc { utc } => Ok((*utc, None)),
        WhenSpec::Local { local_datetime, place } => {
            let input = dhruv_timezone::ResolverInput {
                local_datetime: local_datetime.clone(),
                lat: place.lat,
                lon: place.lon,
                parity_profile,
                ..Default::default()
            };
            let result = dhruv_timezone::resolve(&input, &state.patch_rules).map_err(|e| {
                ApiError::InputInvalid(format!("time resolution failed: {e}"))
            })?;
            let dto = TimeResolutionDto::from(&result);
            Ok((result.utc, Some(dto)))
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn compute_and_assemble(
    state: &AppState,
    utc: DateTime<Utc>,
    frame: FrameType,
    epoch: EpochKind,
    bodies: &[dhruv_core::Body],
    ayanamsha_id: Option<&str>,
    time_resolver: Option<TimeResolutionDto>,
    fp: &str,
) -> Result<Vec<u8>, ApiError> {
    let lsk = state.engine.leap_second_kernel().clone();
    let epoch_tdb_jd = {
        let tdb_epoch = dhruv_time::Epoch::from_utc(
            utc.year(),
            utc.month(),
            utc.day(),
            utc.hour(),
            utc.minute(),
            utc.second() as f64 + f64::from(utc.timestamp_subsec_nanos()) / 1e9,
            &lsk,
        );
        tdb_epoch.as_jd_tdb()
    };

    let (engine_frame, engine_epoch_jd) = match (frame, epoch) {
        (FrameType::EclipticOfDate, EpochKind::OfDate) => (EngineFrame::EclipticOfDate, epoch_tdb_jd),
        (FrameType::Equatorial, EpochKind::J2000) => (EngineFrame::Equatorial, epoch_tdb_jd),
        _ => unreachable!("validated at the request boundary"),
    };

    let queries: Vec<Query> = bodies
        .iter()
        .map(|&target| Query {
            target,
            observer: Observer::Body(dhruv_core::Body::Earth),
            frame: engine_frame,
            epoch_tdb_jd: engine_epoch_jd,
        })
        .collect();

    let engine = Arc::clone(&state.engine);
    let deadline = state.request_deadline;
    let started = Instant::now();

    let rx = state
        .pool
        .submit(move || engine.query_batch(&queries))
        .map_err(|_| {
            state.metrics.record_worker_task("rejected");
            ApiError::ServiceOverloaded
        })?;

    let results = match tokio::time::timeout(deadline, rx).await {
        Ok(Ok(results)) => {
            state.metrics.record_worker_task("completed");
            results
        }
        Ok(Err(_)) => {
            state.metrics.record_worker_task("fault");
            return Err(ApiError::ComputeWorkerFault);
        }
        Err(_) => {
            state.metrics.record_worker_task("timeout");
            return Err(ApiError::ServiceTimeout);
        }
    };

    let use_sidereal = ayanamsha_id.is_some();
    let ayanamsha_provenance = if let Some(id) = ayanamsha_id {
        let record = state
            .ayanamsha_registry
            .resolve(id)
            .map_err(|_| ApiError::AyanamshaUnsupported(id.to_string()))?;
        let t_centuries = dhruv_vedic_base::jd_tdb_to_centuries(epoch_tdb_jd);
        let offset_deg = dhruv_vedic_base::registry::value(record, t_centuries, false);
        Some((offset_deg, AyanamshaProvenance { id: id.to_string(), value_deg: offset_deg }))
    } else {
        None
    };

    let mut bodies_dto = Vec::with_capacity(bodies.len());
    for (body, result) in bodies.iter().zip(results.into_iter()) {
        let result = result.map_err(|e| map_engine_error(&e))?;

        let tropical_lon = result.lon_deg;
        let effective_lon = match &ayanamsha_provenance {
            Some((offset_deg, _)) => dhruv_vedic_base::registry::apply(tropical_lon, *offset_deg),
            None => tropical_lon.rem_euclid(360.0),
        };

        let (sign, degree_in_sign) = domain::sign_for_longitude(effective_lon);
        let dms: Dms = domain::deg_to_dms(degree_in_sign);

        let (ra_hours, dec_deg) = if frame == FrameType::Equatorial {
            (Some(effective_lon / 15.0), Some(result.lat_deg))
        } else {
            (None, None)
        };

        bodies_dto.push(PositionResultDto {
            body: body.name().to_string(),
            longitude_deg: effective_lon,
            latitude_deg: result.lat_deg,
            distance_au: Some(result.distance_au),
            speed_deg_per_day: Some(result.lon_rate_deg_per_day),
            ra_hours,
            dec_deg,
            sign,
            degree_in_sign,
            dms,
            is_retrograde: result.is_retrograde(),
        });
    }

    let bundle_tag = dhruv_core::bundle_tag_for_policy(
        state.bundle_policy,
        epoch_tdb_jd,
        state.de440_start_jd,
        state.de440_end_jd,
    );

    let provenance = Provenance {
        kernel_bundle_tag: bundle_tag.to_string(),
        ephemeris_tag_for_instant: bundle_tag.to_string(),
        frame: match frame {
            FrameType::EclipticOfDate => "ecliptic_of_date".to_string(),
            FrameType::Equatorial => "equatorial".to_string(),
        },
        epoch: match epoch {
            EpochKind::OfDate => "of_date".to_string(),
            EpochKind::J2000 => "J2000".to_string(),
        },
        ayanamsha: ayanamsha_provenance.map(|(_, p)| p),
        time_resolver,
        rule_set_version: state.rule_set_version.clone(),
    };

    let response = PositionsResponse { utc, bodies: bodies_dto, provenance, etag: fp.to_string() };
    let bytes = serde_json::to_vec(&response)
        .map_err(|_| ApiError::ComputeConvergenceFailed)?;

    state.metrics.record_positions_calculated(
        if use_sidereal { "sidereal" } else { "tropical" },
        bundle_tag,
        "miss",
        started.elapsed().as_secs_f64(),
    );
    info!(fingerprint = %fp, elapsed_ms = started.elapsed().as_millis(), "positions computed");

    Ok(bytes)
}
