use crate::ExplorerError;

/// Monotonic tag carried by an in-flight request and checked on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Seq(u64);

impl Seq {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Last-issued-wins bookkeeping: only the newest ticket may be applied.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> Seq {
        self.latest += 1;
        Seq(self.latest)
    }

    pub fn latest(&self) -> Option<Seq> {
        (self.latest > 0).then_some(Seq(self.latest))
    }

    pub fn is_current(&self, seq: Seq) -> bool {
        seq.0 == self.latest
    }

    /// `StaleResultDiscarded` for anything older than the latest issued ticket.
    pub fn check(&self, seq: Seq) -> Result<(), ExplorerError> {
        if self.is_current(seq) {
            Ok(())
        } else {
            Err(ExplorerError::StaleResultDiscarded {
                seq: seq.0,
                current: self.latest,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_is_current() {
        let mut s = RequestSequencer::new();
        assert!(s.latest().is_none());
        let a = s.issue();
        let b = s.issue();
        assert!(s.check(b).is_ok());
        assert_eq!(
            s.check(a),
            Err(ExplorerError::StaleResultDiscarded { seq: 1, current: 2 })
        );
    }
}
