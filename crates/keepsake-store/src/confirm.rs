//! Confirm-then-act: an action that only happens after N clicks on the same
//! item.

use keepsake_model::Grievance;

/// An item that carries its own confirmation counter.
pub trait Confirmable {
    fn confirmations(&self) -> u32;
    fn set_confirmations(&mut self, count: u32);
}

impl Confirmable for Grievance {
    fn confirmations(&self) -> u32 {
        self.click_count
    }

    fn set_confirmations(&mut self, count: u32) {
        self.click_count = count;
    }
}

/// Result of one click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmStep {
    /// More clicks are needed.
    Pending { remaining: u32 },
    /// The threshold was reached; the caller should act.
    Confirmed,
}

impl ConfirmStep {
    pub fn is_confirmed(self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

/// Counts clicks on a [`Confirmable`] item up to a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmThenAct {
    threshold: u32,
}

impl ConfirmThenAct {
    /// A threshold of zero is treated as one.
    pub const fn new(threshold: u32) -> Self {
        Self {
            threshold: if threshold == 0 { 1 } else { threshold },
        }
    }

    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Record a click on `item`.
    pub fn click<T: Confirmable>(&self, item: &mut T) -> ConfirmStep {
        let count = item.confirmations().saturating_add(1);
        item.set_confirmations(count);
        if count >= self.threshold {
            ConfirmStep::Confirmed
        } else {
            ConfirmStep::Pending {
                remaining: self.threshold - count,
            }
        }
    }

    /// Record a click on `items[index]`, removing it once confirmed.
    ///
    /// Returns `None` for an out-of-range index; otherwise the step and the
    /// removed item, if any.
    pub fn click_at<T: Confirmable>(
        &self,
        items: &mut Vec<T>,
        index: usize,
    ) -> Option<(ConfirmStep, Option<T>)> {
        let item = items.get_mut(index)?;
        let step = self.click(item);
        let removed = step.is_confirmed().then(|| items.remove(index));
        Some((step, removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepsake_model::Severity;

    #[test]
    fn two_step_removes_on_second_click() {
        let helper = ConfirmThenAct::new(2);
        let mut items = vec![
            Grievance::new("dishes", Severity::Low),
            Grievance::new("socks", Severity::High),
        ];

        let (step, removed) = helper.click_at(&mut items, 1).unwrap();
        assert_eq!(step, ConfirmStep::Pending { remaining: 1 });
        assert!(removed.is_none());
        assert_eq!(items[1].click_count, 1);

        let (step, removed) = helper.click_at(&mut items, 1).unwrap();
        assert_eq!(step, ConfirmStep::Confirmed);
        assert_eq!(removed.unwrap().details, "socks");
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn out_of_range_is_none() {
        let mut items: Vec<Grievance> = Vec::new();
        assert!(ConfirmThenAct::new(2).click_at(&mut items, 0).is_none());
    }

    #[test]
    fn zero_threshold_confirms_immediately() {
        let mut g = Grievance::new("x", Severity::Medium);
        assert_eq!(ConfirmThenAct::new(0).click(&mut g), ConfirmStep::Confirmed);
    }
}
