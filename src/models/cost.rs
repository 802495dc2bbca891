//! Derived cost of a pod or a pod set

use serde::Serialize;
use std::iter::Sum;
use std::ops::Add;

/// Cost broken down by resource
///
/// Components are never negative. For a single pod `total` is computed from
/// the three components at construction, so `total == cpu + memory + storage`
/// holds exactly. Sums of costs add each field independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Cost {
    total: f64,
    cpu: f64,
    memory: f64,
    storage: f64,
}

impl Cost {
    pub fn new(cpu: f64, memory: f64, storage: f64) -> Self {
        let cpu = non_negative(cpu);
        let memory = non_negative(memory);
        let storage = non_negative(storage);
        Self {
            total: cpu + memory + storage,
            cpu,
            memory,
            storage,
        }
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn cpu(&self) -> f64 {
        self.cpu
    }

    pub fn memory(&self) -> f64 {
        self.memory
    }

    pub fn storage(&self) -> f64 {
        self.storage
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, other: Cost) -> Cost {
        Cost {
            total: self.total + other.total,
            cpu: self.cpu + other.cpu,
            memory: self.memory + other.memory,
            storage: self.storage + other.storage,
        }
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Cost {
        iter.fold(Cost::default(), Add::add)
    }
}

impl<'a> Sum<&'a Cost> for Cost {
    fn sum<I: Iterator<Item = &'a Cost>>(iter: I) -> Cost {
        iter.copied().sum()
    }
}
