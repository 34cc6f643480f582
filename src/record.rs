use serde::{Deserialize, Serialize};

/// The five directly mutable counters of a product row.
///
/// The two derived columns (`shortfall`, `surplus`) are deliberately not
/// part of this enum: they can never be the target of an adjustment.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterField {
    Assembled,
    Shipped,
    Threshold,
    Received,
    Completed,
}

impl CounterField {
    pub const ALL: [CounterField; 5] = [
        CounterField::Assembled,
        CounterField::Shipped,
        CounterField::Threshold,
        CounterField::Received,
        CounterField::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CounterField::Assembled => "assembled",
            CounterField::Shipped => "shipped",
            CounterField::Threshold => "threshold",
            CounterField::Received => "received",
            CounterField::Completed => "completed",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "assembled" => Some(CounterField::Assembled),
            "shipped" => Some(CounterField::Shipped),
            "threshold" => Some(CounterField::Threshold),
            "received" => Some(CounterField::Received),
            "completed" => Some(CounterField::Completed),
            _ => None,
        }
    }

    /// Threshold is display-only on the dashboard: it has no shared control
    /// and can never be the selection target.
    pub fn is_selectable(&self) -> bool {
        !matches!(self, CounterField::Threshold)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct ProductRecord {
    pub product_name: String,
    pub assembled: u32,
    pub shipped: u32,
    pub threshold: u32,
    pub received: u32,
    pub completed: u32,
    pub shortfall: u32,
    pub surplus: u32,
}

impl ProductRecord {
    pub fn new(product_name: String) -> Self {
        ProductRecord {
            product_name,
            assembled: 0,
            shipped: 0,
            threshold: 0,
            received: 0,
            completed: 0,
            shortfall: 0,
            surplus: 0,
        }
    }

    pub fn get(&self, field: CounterField) -> u32 {
        match field {
            CounterField::Assembled => self.assembled,
            CounterField::Shipped => self.shipped,
            CounterField::Threshold => self.threshold,
            CounterField::Received => self.received,
            CounterField::Completed => self.completed,
        }
    }

    pub fn set(&mut self, field: CounterField, value: u32) {
        match field {
            CounterField::Assembled => self.assembled = value,
            CounterField::Shipped => self.shipped = value,
            CounterField::Threshold => self.threshold = value,
            CounterField::Received => self.received = value,
            CounterField::Completed => self.completed = value,
        }

        // Derived columns follow threshold/completed; the other three
        // counters leave them untouched.
        if matches!(field, CounterField::Threshold | CounterField::Completed) {
            self.recompute_derived();
        }
    }

    /// Recompute `shortfall` and `surplus` from `threshold` and `completed`.
    ///
    /// At most one of the two is nonzero: whichever side of the threshold
    /// `completed` sits on, the other figure saturates to 0.
    pub fn recompute_derived(&mut self) {
        self.shortfall = self.threshold.saturating_sub(self.completed);
        self.surplus = self.completed.saturating_sub(self.threshold);
    }
}
