use crate::config::{ConfigError, StrategyConfig, StrategyKind};
use crate::data::PriceSeries;
use crate::strategy::{Signal, StrategyEngine, StrategyError};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

//strategies consulted by the default ensemble, in voting order
pub const DEFAULT_VOTERS: [StrategyKind; 6] = [
    StrategyKind::Rsi,
    StrategyKind::Macd,
    StrategyKind::Ema200Trend,
    StrategyKind::Bollinger,
    StrategyKind::Combo,
    StrategyKind::SmaCrossover,
];

//tally order, also the tie-break order
const TALLY_ORDER: [Signal; 3] = [Signal::Buy, Signal::Sell, Signal::Hold];

//anything that can produce a latest-bar signal for a series
pub trait SignalSource: Send {
    fn name(&self) -> &str;

    fn latest_signal(&mut self, series: &PriceSeries) -> Result<Signal, StrategyError>;
}

impl SignalSource for StrategyEngine {
    fn name(&self) -> &str {
        self.strategy_name()
    }

    fn latest_signal(&mut self, series: &PriceSeries) -> Result<Signal, StrategyError> {
        self.try_generate_signal(series)
    }
}

//one voter's contribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vote {
    pub voter: String,
    //the voter's own signal, none if it failed
    pub raw: Option<Signal>,
    //what was counted: BUY, SELL or HOLD
    pub counted: Signal,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleDecision {
    pub signal: Signal,
    //BUY, SELL, HOLD counts in that order
    pub tally: IndexMap<Signal, usize>,
    pub votes: Vec<Vote>,
}

impl EnsembleDecision {
    pub fn count(&self, signal: Signal) -> usize {
        self.tally.get(&signal).copied().unwrap_or(0)
    }
}

//exits all vote as SELL
pub fn vote_category(signal: Signal) -> Signal {
    match signal {
        Signal::Buy => Signal::Buy,
        Signal::Sell | Signal::StopLoss | Signal::TakeProfit => Signal::Sell,
        Signal::Hold => Signal::Hold,
    }
}

//most common category, ties go to the earliest of BUY, SELL, HOLD
//an empty tally is HOLD
pub fn majority(tally: &IndexMap<Signal, usize>) -> Signal {
    if tally.values().all(|count| *count == 0) {
        return Signal::Hold;
    }
    let mut best = Signal::Hold;
    let mut best_count = None;
    for signal in TALLY_ORDER {
        let count = tally.get(&signal).copied().unwrap_or(0);
        if best_count.map_or(true, |b| count > b) {
            best = signal;
            best_count = Some(count);
        }
    }
    best
}

//majority vote over independent signal sources
pub struct EnsembleAggregator {
    voters: Vec<Box<dyn SignalSource>>,
}

impl EnsembleAggregator {
    pub fn new(voters: Vec<Box<dyn SignalSource>>) -> Self {
        EnsembleAggregator { voters }
    }

    //one fresh engine per default strategy kind
    pub fn default_voters(config: &StrategyConfig) -> Result<Self, ConfigError> {
        let voters = DEFAULT_VOTERS
            .iter()
            .map(|kind| {
                StrategyEngine::from_config(*kind, config)
                    .map(|engine| Box::new(engine) as Box<dyn SignalSource>)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EnsembleAggregator::new(voters))
    }

    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }

    pub fn voter_names(&self) -> Vec<String> {
        self.voters.iter().map(|v| v.name().to_string()).collect()
    }

    //asks every voter in order, a failing voter counts as HOLD
    pub fn vote(&mut self, series: &PriceSeries) -> EnsembleDecision {
        let mut tally: IndexMap<Signal, usize> =
            TALLY_ORDER.iter().map(|signal| (*signal, 0)).collect();
        let mut votes = Vec::with_capacity(self.voters.len());

        for voter in self.voters.iter_mut() {
            let vote = match voter.latest_signal(series) {
                Ok(raw) => Vote {
                    voter: voter.name().to_string(),
                    raw: Some(raw),
                    counted: vote_category(raw),
                    error: None,
                },
                Err(err) => {
                    warn!(voter = voter.name(), error = %err, "voter failed, counting HOLD");
                    Vote {
                        voter: voter.name().to_string(),
                        raw: None,
                        counted: Signal::Hold,
                        error: Some(err.to_string()),
                    }
                }
            };
            *tally.entry(vote.counted).or_insert(0) += 1;
            votes.push(vote);
        }

        let signal = majority(&tally);
        debug!(symbol = series.symbol(), %signal, ?tally, "ensemble decision");

        EnsembleDecision {
            signal,
            tally,
            votes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct Fixed(&'static str, Result<Signal, StrategyError>);

    impl SignalSource for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn latest_signal(&mut self, _series: &PriceSeries) -> Result<Signal, StrategyError> {
            self.1.clone()
        }
    }

    fn fixed(name: &'static str, signal: Signal) -> Box<dyn SignalSource> {
        Box::new(Fixed(name, Ok(signal)))
    }

    fn series() -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::from_closes("TEST", start, &[1.0, 2.0, 3.0]).unwrap()
    }

    #[test]
    fn exits_count_as_sell() {
        let mut ensemble = EnsembleAggregator::new(vec![
            fixed("a", Signal::StopLoss),
            fixed("b", Signal::TakeProfit),
            fixed("c", Signal::Buy),
        ]);
        let decision = ensemble.vote(&series());
        assert_eq!(decision.signal, Signal::Sell);
        assert_eq!(decision.count(Signal::Sell), 2);
        assert_eq!(decision.votes[0].raw, Some(Signal::StopLoss));
    }

    #[test]
    fn ties_prefer_buy_then_sell() {
        let mut buy_sell = EnsembleAggregator::new(vec![
            fixed("a", Signal::Sell),
            fixed("b", Signal::Buy),
        ]);
        assert_eq!(buy_sell.vote(&series()).signal, Signal::Buy);

        let mut sell_hold = EnsembleAggregator::new(vec![
            fixed("a", Signal::Hold),
            fixed("b", Signal::Sell),
        ]);
        assert_eq!(sell_hold.vote(&series()).signal, Signal::Sell);
    }

    #[test]
    fn failing_voter_counts_as_hold() {
        let failure = StrategyError::Failed {
            strategy: "broken".to_string(),
            reason: "boom".to_string(),
        };
        let mut ensemble = EnsembleAggregator::new(vec![
            fixed("a", Signal::Buy),
            Box::new(Fixed("broken", Err(failure))),
            fixed("c", Signal::Hold),
        ]);
        let decision = ensemble.vote(&series());
        assert_eq!(decision.count(Signal::Hold), 2);
        assert_eq!(decision.signal, Signal::Hold);
        assert_eq!(decision.votes[1].counted, Signal::Hold);
        assert!(decision.votes[1].error.as_deref().unwrap().contains("boom"));
    }

    #[test]
    fn no_voters_hold() {
        let mut ensemble = EnsembleAggregator::new(vec![]);
        let decision = ensemble.vote(&series());
        assert_eq!(decision.signal, Signal::Hold);
        assert!(decision.votes.is_empty());
    }

    #[test]
    fn tally_keeps_fixed_order() {
        let mut ensemble = EnsembleAggregator::new(vec![fixed("a", Signal::Hold)]);
        let decision = ensemble.vote(&series());
        let keys: Vec<Signal> = decision.tally.keys().copied().collect();
        assert_eq!(keys, TALLY_ORDER.to_vec());
    }

    #[test]
    fn default_voters_are_engines() {
        let mut ensemble = EnsembleAggregator::default_voters(&StrategyConfig::default()).unwrap();
        assert_eq!(ensemble.len(), 6);
        assert_eq!(ensemble.voter_names()[0], "RSIStrategy");

        //too short for every voter: all hold
        let decision = ensemble.vote(&series());
        assert_eq!(decision.signal, Signal::Hold);
        assert_eq!(decision.count(Signal::Hold), 6);

        //empty series fails every voter
        let empty = PriceSeries::new("NONE", vec![]).unwrap();
        let decision = ensemble.vote(&empty);
        assert!(decision.votes.iter().all(|v| v.error.is_some()));
        assert_eq!(decision.signal, Signal::Hold);
    }
}
