/// Parliamentary vote counts derived from the number of competitors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub majority: u32,
    pub two_thirds: u32,
}

impl Thresholds {
    pub fn for_competitors(total: u32) -> Self {
        let total = total.max(1);
        Self {
            majority: total / 2 + 1,
            two_thirds: (u64::from(total) * 2 / 3 + 1) as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundState {
    pub number: u32,
    pub total_competitors: u32,
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new(16)
    }
}

impl RoundState {
    pub fn new(total_competitors: u32) -> Self {
        Self {
            number: 1,
            total_competitors: total_competitors.max(1),
        }
    }

    pub fn advance(&mut self) {
        self.number += 1;
    }

    pub fn reset(&mut self) {
        self.number = 1;
    }

    pub fn set_total_competitors(&mut self, n: u32) -> Thresholds {
        self.total_competitors = n.max(1);
        self.thresholds()
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds::for_competitors(self.total_competitors)
    }
}
