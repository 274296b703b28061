//! Presentation state for the single detector screen.

use crate::client::{FlightGuard, InFlight};
use crate::error::{ConfigError, Notice, PredictError};
use crate::prediction::{ImageRef, PredictionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ImageSelected,
    Predicting,
    Resulted,
}

/// Identifies the dispatch a completion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Work handed to the upload worker. Dropping it releases the in-flight flag.
#[derive(Debug)]
pub struct PendingPrediction {
    pub ticket: Ticket,
    pub image: ImageRef,
    pub flight: FlightGuard,
}

/// Selected image, last prediction and the in-flight flag.
#[derive(Debug, Default)]
pub struct Session {
    selected: Option<ImageRef>,
    prediction: Option<PredictionResult>,
    in_flight: InFlight,
    generation: u64,
}

impl Session {
    pub fn new(in_flight: InFlight) -> Self {
        Self {
            in_flight,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        match (&self.selected, &self.prediction) {
            (None, _) => Phase::Idle,
            (Some(_), _) if self.in_flight.is_set() => Phase::Predicting,
            (Some(_), None) => Phase::ImageSelected,
            (Some(_), Some(_)) => Phase::Resulted,
        }
    }

    pub fn selected(&self) -> Option<&ImageRef> {
        self.selected.as_ref()
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        self.prediction.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_set()
    }

    pub fn can_pick(&self) -> bool {
        !self.is_in_flight()
    }

    pub fn can_predict(&self) -> bool {
        self.selected.is_some() && !self.is_in_flight()
    }

    pub fn can_reset(&self) -> bool {
        (self.selected.is_some() || self.prediction.is_some()) && !self.is_in_flight()
    }

    /// A new image replaces the old one and drops any prediction.
    pub fn image_selected(&mut self, image: ImageRef) {
        self.selected = Some(image);
        self.prediction = None;
        self.generation += 1;
    }

    pub fn begin_prediction(&mut self) -> Result<PendingPrediction, PredictError> {
        let image = self.selected.clone().ok_or(ConfigError::NoImage)?;
        let flight = self.in_flight.try_acquire().ok_or(PredictError::Busy)?;
        self.prediction = None;
        Ok(PendingPrediction {
            ticket: Ticket(self.generation),
            image,
            flight,
        })
    }

    /// Apply an upload outcome. Returns the notice to show, if any.
    pub fn complete_prediction(
        &mut self,
        ticket: Ticket,
        outcome: Result<PredictionResult, PredictError>,
    ) -> Option<Notice> {
        if ticket.0 != self.generation {
            tracing::debug!("discarding stale prediction outcome");
            return None;
        }
        match outcome {
            Ok(result) => {
                self.prediction = Some(result);
                None
            }
            Err(err) => {
                self.prediction = None;
                err.notice()
            }
        }
    }

    pub fn reset(&mut self) {
        self.selected = None;
        self.prediction = None;
        self.generation += 1;
    }
}
