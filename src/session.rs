//! Interactive creation of a single structure.
//!
//! A session collects two anchor points, lets the user tune the shape while a
//! preview is shown, and ends either finalized or cancelled.

use tracing::debug;

use crate::config::{
    validate_segments, validate_slack, validate_spacing, CatenaryConfig, PlacementParams,
};
use crate::error::{Result, SessionError};
use crate::math::Point3;
use crate::operations::solve::{FitMidpointHeight, MidpointFit};
use crate::placement::{PlacementPipeline, PlacementPlan};
use crate::structure::{StructureData, StructureParams};

/// Where a [`Session`] is in the creation flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    AwaitingFirstPoint,
    AwaitingSecondPoint { first: Point3 },
    Previewing { params: StructureParams },
    Finalized { params: StructureParams },
    Cancelled,
}

impl SessionState {
    /// Returns a short human-readable name, used in error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AwaitingFirstPoint => "awaiting the first point",
            Self::AwaitingSecondPoint { .. } => "awaiting the second point",
            Self::Previewing { .. } => "previewing",
            Self::Finalized { .. } => "finalized",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns `true` once the session is finalized or cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finalized { .. } | Self::Cancelled)
    }
}

/// A single structure creation flow.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    defaults: PlacementParams,
    pipeline: PlacementPipeline,
    preset: Option<String>,
}

impl Session {
    /// Starts a session that uses `defaults` for new structures.
    #[must_use]
    pub fn new(defaults: PlacementParams, pipeline: PlacementPipeline) -> Self {
        Self {
            state: SessionState::AwaitingFirstPoint,
            defaults,
            pipeline,
            preset: None,
        }
    }

    /// Starts a session for the preset `id` of `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the preset does not exist.
    pub fn from_preset(config: &CatenaryConfig, id: &str) -> Result<Self> {
        let preset = config.preset(id)?;
        let mut session = Self::new(preset.params, config.pipeline());
        session.preset = Some(id.to_owned());
        Ok(session)
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the id of the preset this session was started from.
    #[must_use]
    pub fn preset(&self) -> Option<&str> {
        self.preset.as_deref()
    }

    /// Records an anchor point. The second point starts the preview.
    ///
    /// # Errors
    ///
    /// Returns an error if both points are already selected.
    pub fn select_point(&mut self, point: Point3) -> Result<()> {
        self.state = match self.state {
            SessionState::AwaitingFirstPoint => SessionState::AwaitingSecondPoint { first: point },
            SessionState::AwaitingSecondPoint { first } => SessionState::Previewing {
                params: StructureParams::with_defaults(first, point, &self.defaults),
            },
            _ => return Err(self.invalid("select a point")),
        };
        debug!(state = self.state.name(), "selected point");
        Ok(())
    }

    /// Changes the slack of the previewed structure.
    ///
    /// # Errors
    ///
    /// Returns an error if not previewing or the value is out of range.
    pub fn set_slack(&mut self, slack: f64) -> Result<()> {
        let slack = validate_slack(slack)?;
        self.previewing_mut("set slack")?.slack = slack;
        Ok(())
    }

    /// Changes the segment count of the previewed structure.
    ///
    /// # Errors
    ///
    /// Returns an error if not previewing or the value is out of range.
    pub fn set_segment_count(&mut self, segment_count: usize) -> Result<()> {
        let segment_count = validate_segments(segment_count)?;
        self.previewing_mut("set segment count")?.segment_count = segment_count;
        Ok(())
    }

    /// Changes the element spacing of the previewed structure.
    ///
    /// # Errors
    ///
    /// Returns an error if not previewing or the value is out of range.
    pub fn set_spacing(&mut self, spacing: f64) -> Result<()> {
        let spacing = validate_spacing(spacing)?;
        self.previewing_mut("set spacing")?.spacing = spacing;
        Ok(())
    }

    /// Adopts the slack that brings the previewed curve's middle vertex
    /// closest to `target_y`.
    ///
    /// # Errors
    ///
    /// Returns an error if not previewing.
    pub fn fit_midpoint(&mut self, target_y: f64) -> Result<MidpointFit> {
        let params = self.previewing_mut("fit the midpoint")?;
        let (_, fit) =
            FitMidpointHeight::new(params.start, params.end, target_y, params.segment_count)
                .execute();
        params.slack = fit.slack;
        Ok(fit)
    }

    /// Computes the plan for the current preview.
    ///
    /// # Errors
    ///
    /// Returns an error if not previewing.
    pub fn preview(&self) -> Result<PlacementPlan> {
        match self.state {
            SessionState::Previewing { params } => Ok(params.plan(&self.pipeline)),
            _ => Err(self.invalid("preview")),
        }
    }

    /// Ends the session and returns the chosen parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if not previewing.
    pub fn finalize(&mut self) -> Result<StructureParams> {
        let SessionState::Previewing { params } = self.state else {
            return Err(self.invalid("finalize"));
        };
        self.state = SessionState::Finalized { params };
        debug!(?params, "finalized session");
        Ok(params)
    }

    /// Ends the session and wraps the result for a structure store.
    ///
    /// # Errors
    ///
    /// Returns an error if not previewing.
    pub fn finalize_into(&mut self, name: impl Into<String>) -> Result<StructureData> {
        let params = self.finalize()?;
        let data = StructureData::new(name, params);
        Ok(match &self.preset {
            Some(preset) => data.with_preset(preset.clone()),
            None => data,
        })
    }

    /// Abandons the session. Cancelling a finished session is a no-op.
    pub fn cancel(&mut self) {
        if !self.state.is_finished() {
            self.state = SessionState::Cancelled;
            debug!("cancelled session");
        }
    }

    fn previewing_mut(&mut self, action: &'static str) -> Result<&mut StructureParams> {
        let state = self.state.name();
        match &mut self.state {
            SessionState::Previewing { params } => Ok(params),
            _ => Err(SessionError::InvalidTransition { state, action }.into()),
        }
    }

    fn invalid(&self, action: &'static str) -> crate::error::CatenaryError {
        SessionError::InvalidTransition {
            state: self.state.name(),
            action,
        }
        .into()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{CatenaryError, ConfigError, GeometryError};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn previewing() -> Session {
        let mut session = Session::new(PlacementParams::default(), PlacementPipeline::default());
        session.select_point(p(0.0, 10.0, 0.0)).unwrap();
        session.select_point(p(10.0, 10.0, 0.0)).unwrap();
        session
    }

    fn is_invalid_transition(result: Result<impl std::fmt::Debug>) -> bool {
        matches!(
            result,
            Err(CatenaryError::Session(SessionError::InvalidTransition { .. }))
        )
    }

    #[test]
    fn two_points_start_the_preview() {
        let mut session = Session::new(PlacementParams::default(), PlacementPipeline::default());
        assert_eq!(*session.state(), SessionState::AwaitingFirstPoint);
        assert!(is_invalid_transition(session.preview()));

        session.select_point(p(0.0, 10.0, 0.0)).unwrap();
        assert_eq!(
            *session.state(),
            SessionState::AwaitingSecondPoint {
                first: p(0.0, 10.0, 0.0)
            }
        );

        session.select_point(p(10.0, 10.0, 0.0)).unwrap();
        let SessionState::Previewing { params } = *session.state() else {
            panic!("expected preview, got {:?}", session.state());
        };
        assert_eq!(params.start, p(0.0, 10.0, 0.0));
        assert_eq!(params.end, p(10.0, 10.0, 0.0));
        assert_eq!(params.segment_count, 10);
        assert!(!session.preview().unwrap().is_empty());

        assert!(is_invalid_transition(session.select_point(p(1.0, 1.0, 1.0))));
    }

    #[test]
    fn tuning_changes_the_preview() {
        let mut session = previewing();
        let before = session.preview().unwrap();

        session.set_spacing(0.25).unwrap();
        session.set_segment_count(20).unwrap();
        session.set_slack(0.8).unwrap();
        let after = session.preview().unwrap();

        assert!(after.len() > before.len());
        assert!(after.arc_length > before.arc_length);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut session = previewing();
        assert!(matches!(
            session.set_slack(1.5),
            Err(CatenaryError::Geometry(
                GeometryError::ParameterOutOfRange {
                    parameter: "slack",
                    ..
                }
            ))
        ));
        assert!(session.set_segment_count(1).is_err());
        assert!(session.set_spacing(0.0).is_err());

        let SessionState::Previewing { params } = *session.state() else {
            panic!("left preview");
        };
        assert_eq!(params.segment_count, 10);
    }

    #[test]
    fn midpoint_fit_updates_slack() {
        let mut session = previewing();
        let fit = session.fit_midpoint(7.0).unwrap();
        assert!(fit.converged);

        let params = session.finalize().unwrap();
        assert!((params.slack - fit.slack).abs() < f64::EPSILON);
        assert!(matches!(session.state(), SessionState::Finalized { .. }));
    }

    #[test]
    fn finished_sessions_reject_edits() {
        let mut session = previewing();
        session.finalize().unwrap();

        assert!(is_invalid_transition(session.finalize()));
        assert!(is_invalid_transition(session.set_slack(0.5)));
        assert!(is_invalid_transition(session.fit_midpoint(5.0)));

        session.cancel();
        assert!(matches!(session.state(), SessionState::Finalized { .. }));
    }

    #[test]
    fn cancel_from_any_active_state() {
        let mut session = Session::new(PlacementParams::default(), PlacementPipeline::default());
        session.cancel();
        assert_eq!(*session.state(), SessionState::Cancelled);
        assert!(is_invalid_transition(session.select_point(p(0.0, 0.0, 0.0))));

        let mut session = previewing();
        session.cancel();
        assert_eq!(*session.state(), SessionState::Cancelled);
        assert!(is_invalid_transition(session.preview()));
    }

    #[test]
    fn preset_session_uses_preset_params() {
        let config = CatenaryConfig::default();
        let mut session = Session::from_preset(&config, "lantern").unwrap();
        assert_eq!(session.preset(), Some("lantern"));

        session.select_point(p(0.0, 5.0, 0.0)).unwrap();
        session.select_point(p(8.0, 5.0, 0.0)).unwrap();
        let data = session.finalize_into("garden lights").unwrap();

        assert_eq!(data.preset.as_deref(), Some("lantern"));
        assert!((data.params.spacing - 2.0).abs() < f64::EPSILON);
        assert_eq!(data.params.segment_count, 8);
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let config = CatenaryConfig::default();
        assert!(matches!(
            Session::from_preset(&config, "rope"),
            Err(CatenaryError::Config(ConfigError::UnknownPreset(_)))
        ));
    }

    #[test]
    fn transition_error_names_state_and_action() {
        let session = Session::new(PlacementParams::default(), PlacementPipeline::default());
        let err = session.preview().unwrap_err();
        assert_eq!(err.to_string(), "cannot preview while awaiting the first point");
    }
}
