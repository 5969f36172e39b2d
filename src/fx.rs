// ---------------------------------------------------------------------------
// Per-nozzle effect feedback
// ---------------------------------------------------------------------------

/// Lowest effect power shown for a nozzle that is firing at all.
pub const MIN_VISIBLE_POWER: f64 = 0.1;

/// Receives per-nozzle plume state after each step. Observational only.
pub trait ThrusterEffectSink {
    fn set_inactive(&mut self, index: usize);
    fn set_active(&mut self, index: usize, power: f64);
}

/// Discards all effect updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFx;

impl ThrusterEffectSink for NullFx {
    fn set_inactive(&mut self, _index: usize) {}
    fn set_active(&mut self, _index: usize, _power: f64) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlumeState {
    pub active: bool,
    pub power: f64,
}

/// Keeps the last plume state of every nozzle, e.g. for a renderer to poll.
#[derive(Debug, Clone, Default)]
pub struct FxBank {
    plumes: Vec<PlumeState>,
}

impl FxBank {
    pub fn new(count: usize) -> Self {
        Self { plumes: vec![PlumeState::default(); count] }
    }

    pub fn plumes(&self) -> &[PlumeState] {
        &self.plumes
    }

    pub fn active_count(&self) -> usize {
        self.plumes.iter().filter(|p| p.active).count()
    }

    fn slot(&mut self, index: usize) -> &mut PlumeState {
        if index >= self.plumes.len() {
            self.plumes.resize(index + 1, PlumeState::default());
        }
        &mut self.plumes[index]
    }
}

impl ThrusterEffectSink for FxBank {
    fn set_inactive(&mut self, index: usize) {
        *self.slot(index) = PlumeState { active: false, power: 0.0 };
    }

    fn set_active(&mut self, index: usize, power: f64) {
        *self.slot(index) = PlumeState { active: true, power };
    }
}
