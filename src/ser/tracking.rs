//! Deferred container emission.

use crate::engine::{EngineResult, RawEncoder};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ContainerKind {
    Keyed,
    Unkeyed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum State {
    NotStarted,
    Started,
    Closed,
}

/// Tracks one serialization scope. The begin event of a requested container is held back
/// until the first element is written, and emitted exactly once.
#[derive(Debug)]
pub(crate) struct Tracking {
    kind: Option<ContainerKind>,
    state: State,
}

impl Tracking {
    #[inline]
    pub(crate) const fn new() -> Self {
        Self {
            kind: None,
            state: State::NotStarted,
        }
    }

    #[inline]
    pub(crate) const fn requested(kind: ContainerKind) -> Self {
        Self {
            kind: Some(kind),
            state: State::NotStarted,
        }
    }

    #[inline]
    pub(crate) fn request(&mut self, kind: ContainerKind) {
        debug_assert_eq!(self.state, State::NotStarted);
        self.kind = Some(kind);
    }

    #[inline]
    pub(crate) fn state(&self) -> State {
        self.state
    }

    /// Emits the begin event if it has not been emitted yet.
    #[inline]
    pub(crate) fn ensure_started(&mut self, raw: &mut RawEncoder) -> EngineResult<()> {
        if self.state == State::NotStarted {
            if let Some(kind) = self.kind {
                begin(kind, raw)?;
                self.state = State::Started;
            }
        }
        Ok(())
    }

    /// Ends the scope: a started container is closed, a requested but empty container is
    /// written as an empty begin/end pair, and a scope that requested nothing writes nothing.
    pub(crate) fn close(&mut self, raw: &mut RawEncoder) -> EngineResult<()> {
        match (self.state, self.kind) {
            (State::Started, _) => raw.end_container()?,
            (State::NotStarted, Some(kind)) => {
                begin(kind, raw)?;
                raw.end_container()?;
            }
            (State::NotStarted, None) | (State::Closed, _) => {}
        }
        self.state = State::Closed;
        Ok(())
    }
}

#[inline]
fn begin(kind: ContainerKind, raw: &mut RawEncoder) -> EngineResult<()> {
    match kind {
        ContainerKind::Keyed => raw.begin_object(),
        ContainerKind::Unkeyed => raw.begin_array(),
    }
}
