use crate::models::{Label, Record, Summary};

/// Default number of extremes shown on the console.
pub const DEFAULT_EXTREMES: usize = 3;

pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Running label counts and compound sum, folded one record at a time.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    count: usize,
    total_compound: f64,
    positive: usize,
    neutral: usize,
    negative: usize,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, r: &Record) {
        self.count += 1;
        self.total_compound += r.compound;
        match r.label {
            Label::Positive => self.positive += 1,
            Label::Neutral => self.neutral += 1,
            Label::Negative => self.negative += 1,
        }
    }

    pub fn summary(&self) -> Summary {
        // empty set averages over 1, giving 0.0 rather than NaN
        let denom = self.count.max(1) as f64;
        Summary {
            count: self.count,
            avg_compound: round4(self.total_compound / denom),
            positive: self.positive,
            neutral: self.neutral,
            negative: self.negative,
        }
    }
}

pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a Record>) -> Summary {
    let mut tally = Tally::new();
    for r in records {
        tally.push(r);
    }
    tally.summary()
}

/// Most negative and most positive `k` records. Ties keep arrival order in both lists.
pub fn extremes(records: &[Record], k: usize) -> (Vec<&Record>, Vec<&Record>) {
    let mut worst: Vec<&Record> = records.iter().collect();
    worst.sort_by(|a, b| a.compound.total_cmp(&b.compound));
    worst.truncate(k);

    let mut best: Vec<&Record> = records.iter().collect();
    best.sort_by(|a, b| b.compound.total_cmp(&a.compound));
    best.truncate(k);

    (worst, best)
}
