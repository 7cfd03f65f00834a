//! Simulated upstream trading system.
//!
//! Produces a handful of trades with a full 24-period volume profile and
//! fails at a configurable rate, so the service can be run end to end
//! without a real trade feed.

use crate::domain::error::TradeSourceError;
use crate::domain::position::HOURS_PER_DAY;
use crate::domain::trade::{Trade, TradePeriod};
use crate::ports::trade_port::TradePort;
use chrono::NaiveDate;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const MAX_TRADES: usize = 5;

pub struct SimulatedTradeAdapter {
    rng: Mutex<StdRng>,
    failure_rate: f64,
}

impl SimulatedTradeAdapter {
    pub fn new(failure_rate: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }
}

impl TradePort for SimulatedTradeAdapter {
    fn get_trades(&self, date: NaiveDate) -> Result<Vec<Trade>, TradeSourceError> {
        let mut rng = self.rng.lock();
        if rng.gen_bool(self.failure_rate) {
            return Err(TradeSourceError::Unavailable {
                reason: format!("simulated outage fetching trades for {date}"),
            });
        }

        let count = rng.gen_range(1..=MAX_TRADES);
        let trades = (0..count)
            .map(|n| {
                let periods = (1..=HOURS_PER_DAY as i32)
                    .map(|period| {
                        let volume = (rng.gen_range(-500.0..500.0_f64) * 10.0).round() / 10.0;
                        TradePeriod::new(period, volume)
                    })
                    .collect();
                Trade::new(format!("{}-{:03}", date.format("%Y%m%d"), n + 1), periods)
            })
            .collect();

        Ok(trades)
    }
}
