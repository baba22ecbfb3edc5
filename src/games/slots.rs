use rand::Rng;

use super::GameEffect;
use crate::session::JACKPOT_SEED;

pub const MIN_BET: u64 = 50;
pub const MAX_BET: u64 = 1000;
pub const BET_STEP: u64 = 50;

/// Share of every spin fed into the progressive jackpot, in percent.
const PROGRESSIVE_CUT_PCT: u64 = 10;

/// Wins at or above this multiple of the bet are notable.
const BIG_WIN_MULTIPLIER: u64 = 10;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Symbol {
    Cherry,
    Lemon,
    Bell,
    Bar,
    Seven,
    Dragon,
}

impl Symbol {
    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Cherry => "\u{1f352}",
            Symbol::Lemon => "\u{1f34b}",
            Symbol::Bell => "\u{1f514}",
            Symbol::Bar => "\u{1f4b0}",
            Symbol::Seven => "7\u{fe0f}\u{20e3}",
            Symbol::Dragon => "\u{1f409}",
        }
    }
}

// Weighted strip: commonest first. Sevens stay rare because a triple pays
// the whole progressive pot.
const STRIP: &[(Symbol, u32)] = &[
    (Symbol::Cherry, 30),
    (Symbol::Lemon, 26),
    (Symbol::Bell, 18),
    (Symbol::Bar, 14),
    (Symbol::Dragon, 8),
    (Symbol::Seven, 4),
];

fn triple_payout_multiplier(symbol: Symbol) -> u64 {
    match symbol {
        Symbol::Cherry => 5,
        Symbol::Lemon => 8,
        Symbol::Bell => 12,
        Symbol::Bar => 20,
        Symbol::Dragon => 40,
        // A triple seven pays the progressive pot instead.
        Symbol::Seven => 0,
    }
}

#[derive(Debug)]
pub struct SlotMachine {
    pub bet: u64,
    pub reels: [Symbol; 3],
    pub last_win: u64,
    pub spins: u64,
}

impl Default for SlotMachine {
    fn default() -> Self {
        Self {
            bet: MIN_BET,
            reels: [Symbol::Cherry, Symbol::Lemon, Symbol::Bell],
            last_win: 0,
            spins: 0,
        }
    }
}

impl SlotMachine {
    pub fn raise_bet(&mut self) {
        self.bet = (self.bet + BET_STEP).min(MAX_BET);
    }

    pub fn lower_bet(&mut self) {
        self.bet = self.bet.saturating_sub(BET_STEP).max(MIN_BET);
    }

    /// One pull. `balance` and `jackpot` are read-only views of the shared
    /// session; all mutation is returned as delta intents.
    pub fn spin<R: Rng>(
        &mut self,
        rng: &mut R,
        balance: u64,
        jackpot: u64,
    ) -> Vec<GameEffect> {
        if balance < self.bet {
            return Vec::new();
        }
        self.spins += 1;
        self.reels = [draw_symbol(rng), draw_symbol(rng), draw_symbol(rng)];

        let mut effects = vec![
            GameEffect::Credit(-(self.bet as i64)),
            GameEffect::Jackpot((self.bet * PROGRESSIVE_CUT_PCT / 100) as i64),
        ];

        let [a, b, c] = self.reels;
        if a == b && b == c {
            if a == Symbol::Seven {
                // The pot is paid out and falls back to its seed.
                self.last_win = jackpot;
                effects.push(GameEffect::Credit(jackpot as i64));
                effects.push(GameEffect::Jackpot(
                    JACKPOT_SEED as i64 - jackpot as i64,
                ));
                effects.push(GameEffect::Notable(format!(
                    "hit the progressive jackpot for {jackpot} chips on triple sevens"
                )));
            } else {
                let win = self.bet * triple_payout_multiplier(a);
                self.last_win = win;
                effects.push(GameEffect::Credit(win as i64));
                if win >= self.bet * BIG_WIN_MULTIPLIER {
                    effects.push(GameEffect::Notable(format!(
                        "landed a triple {:?} for {win} chips",
                        a
                    )));
                }
            }
        } else if a == b || b == c || a == c {
            // Any pair returns the stake.
            self.last_win = self.bet;
            effects.push(GameEffect::Credit(self.bet as i64));
        } else {
            self.last_win = 0;
        }
        effects
    }
}

fn draw_symbol<R: Rng>(rng: &mut R) -> Symbol {
    let total: u32 = STRIP.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random_range(0..total);
    for (symbol, weight) in STRIP {
        if roll < *weight {
            return *symbol;
        }
        roll -= weight;
    }
    STRIP[0].0
}
