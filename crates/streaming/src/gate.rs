use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The three streaming subsystems a moving camera can pause.
///
/// While a gate is held, its subsystem must not start new background work
/// tied to camera movement; a fast transient fly-through would otherwise
/// thrash tile loads that are obsolete by the time they land.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    LayerStream,
    TerrainStream,
    NormalMapGen,
}

impl GateKind {
    pub const ALL: [GateKind; 3] = [
        GateKind::LayerStream,
        GateKind::TerrainStream,
        GateKind::NormalMapGen,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GateKind::LayerStream => "layer-stream",
            GateKind::TerrainStream => "terrain-stream",
            GateKind::NormalMapGen => "normal-map-gen",
        }
    }
}

/// Opaque key identifying one camera's claim on a gate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LockToken(pub u64);

/// One lockable subsystem gate.
///
/// Double-acquire and double-free are programming-contract violations
/// (flight start always frees before re-acquiring), so they are asserts
/// rather than recoverable errors.
#[derive(Debug, Default)]
pub struct Gate {
    holders: BTreeSet<LockToken>,
    lock_calls: u64,
    free_calls: u64,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&mut self, token: LockToken) {
        let inserted = self.holders.insert(token);
        debug_assert!(inserted, "gate lock with already-held token {token:?}");
        self.lock_calls += 1;
    }

    pub fn free(&mut self, token: LockToken) {
        let removed = self.holders.remove(&token);
        debug_assert!(removed, "gate free without matching lock {token:?}");
        self.free_calls += 1;
    }

    pub fn is_held(&self) -> bool {
        !self.holders.is_empty()
    }

    pub fn is_held_by(&self, token: LockToken) -> bool {
        self.holders.contains(&token)
    }

    pub fn lock_calls(&self) -> u64 {
        self.lock_calls
    }

    pub fn free_calls(&self) -> u64 {
        self.free_calls
    }
}

/// All three gates, addressed by [`GateKind`].
#[derive(Debug, Default)]
pub struct GateSet {
    layer: Gate,
    terrain: Gate,
    normal_map: Gate,
}

impl GateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gate(&self, kind: GateKind) -> &Gate {
        match kind {
            GateKind::LayerStream => &self.layer,
            GateKind::TerrainStream => &self.terrain,
            GateKind::NormalMapGen => &self.normal_map,
        }
    }

    pub fn gate_mut(&mut self, kind: GateKind) -> &mut Gate {
        match kind {
            GateKind::LayerStream => &mut self.layer,
            GateKind::TerrainStream => &mut self.terrain,
            GateKind::NormalMapGen => &mut self.normal_map,
        }
    }

    pub fn lock_all(&mut self, token: LockToken) {
        for kind in GateKind::ALL {
            self.gate_mut(kind).lock(token);
        }
    }

    pub fn free_all(&mut self, token: LockToken) {
        for kind in GateKind::ALL {
            self.gate_mut(kind).free(token);
        }
    }

    pub fn any_held(&self) -> bool {
        GateKind::ALL.iter().any(|&k| self.gate(k).is_held())
    }
}
