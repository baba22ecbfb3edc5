use rand::Rng;

use super::GameEffect;

pub const SHOT_COST: u64 = 50;
pub const LANES: usize = 5;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Species {
    Minnow,
    Snapper,
    Lionfish,
    Shark,
    OceanKing,
}

impl Species {
    pub fn label(self) -> &'static str {
        match self {
            Species::Minnow => "Minnow",
            Species::Snapper => "Snapper",
            Species::Lionfish => "Lionfish",
            Species::Shark => "Shark",
            Species::OceanKing => "Ocean King",
        }
    }

    pub fn bounty(self) -> u64 {
        match self {
            Species::Minnow => 75,
            Species::Snapper => 150,
            Species::Lionfish => 400,
            Species::Shark => 1200,
            Species::OceanKing => 5000,
        }
    }

    /// Catch probability; richer fish are harder to land.
    fn catch_chance(self) -> f64 {
        match self {
            Species::Minnow => 0.65,
            Species::Snapper => 0.45,
            Species::Lionfish => 0.25,
            Species::Shark => 0.10,
            Species::OceanKing => 0.03,
        }
    }

    fn is_boss(self) -> bool {
        matches!(self, Species::Shark | Species::OceanKing)
    }
}

const SPAWN_TABLE: &[(Species, u32)] = &[
    (Species::Minnow, 40),
    (Species::Snapper, 30),
    (Species::Lionfish, 18),
    (Species::Shark, 9),
    (Species::OceanKing, 3),
];

#[derive(Debug)]
pub struct FishArena {
    pub lanes: Vec<Species>,
    pub aim: usize,
    pub shots: u64,
    pub caught_value: u64,
    pub last_result: Option<(Species, bool)>,
}

impl FishArena {
    pub fn spawn<R: Rng>(rng: &mut R) -> Self {
        Self {
            lanes: (0..LANES).map(|_| spawn_fish(rng)).collect(),
            aim: 0,
            shots: 0,
            caught_value: 0,
            last_result: None,
        }
    }

    pub fn aim_up(&mut self) {
        self.aim = self.aim.saturating_sub(1);
    }

    pub fn aim_down(&mut self) {
        self.aim = (self.aim + 1).min(self.lanes.len().saturating_sub(1));
    }

    /// Fires at the aimed lane. Every shot costs chips; a landed catch pays
    /// the bounty and the lane respawns.
    pub fn shoot<R: Rng>(&mut self, rng: &mut R, balance: u64) -> Vec<GameEffect> {
        if balance < SHOT_COST {
            return Vec::new();
        }
        let Some(target) = self.lanes.get(self.aim).copied() else {
            return Vec::new();
        };
        self.shots += 1;
        let mut effects = vec![GameEffect::Credit(-(SHOT_COST as i64))];
        let caught = rng.random::<f64>() < target.catch_chance();
        self.last_result = Some((target, caught));
        if caught {
            self.caught_value += target.bounty();
            effects.push(GameEffect::Credit(target.bounty() as i64));
            self.lanes[self.aim] = spawn_fish(rng);
            if target.is_boss() {
                effects.push(GameEffect::Notable(format!(
                    "harpooned the {} for {} chips",
                    target.label(),
                    target.bounty()
                )));
            }
        }
        effects
    }
}

fn spawn_fish<R: Rng>(rng: &mut R) -> Species {
    let total: u32 = SPAWN_TABLE.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random_range(0..total);
    for (species, weight) in SPAWN_TABLE {
        if roll < *weight {
            return *species;
        }
        roll -= weight;
    }
    SPAWN_TABLE[0].0
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn shoot__with_insufficient_balance_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut arena = FishArena::spawn(&mut rng);
        assert!(arena.shoot(&mut rng, SHOT_COST - 1).is_empty());
        assert_eq!(arena.shots, 0);
    }

    #[test]
    fn shoot__always_debits_the_shot_cost() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut arena = FishArena::spawn(&mut rng);
        let effects = arena.shoot(&mut rng, 1_000);
        assert_eq!(effects[0], GameEffect::Credit(-(SHOT_COST as i64)));
    }

    #[test]
    fn aim__stays_within_the_lane_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut arena = FishArena::spawn(&mut rng);
        arena.aim_up();
        assert_eq!(arena.aim, 0);
        for _ in 0..20 {
            arena.aim_down();
        }
        assert_eq!(arena.aim, LANES - 1);
    }
}
