/// The target sequence for one session.
///
/// Generated once from a uniform random source, then never mutated.
/// Each level tests a prefix of it.

use rand::Rng;

use super::button::Button;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence {
    steps: Vec<Button>,
}

impl Sequence {
    pub fn generate<R: Rng + ?Sized>(len: u32, rng: &mut R) -> Self {
        let steps = (0..len)
            .map(|_| Button::ALL[rng.gen_range(0..Button::ALL.len())])
            .collect();
        Sequence { steps }
    }

    /// Build from raw indices; anything outside 0..3 is rejected.
    #[cfg(test)]
    pub fn from_indices(indices: &[usize]) -> Option<Self> {
        let steps = indices
            .iter()
            .map(|&i| Button::from_index(i))
            .collect::<Option<Vec<_>>>()?;
        Some(Sequence { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// The first `level` steps (clamped to the sequence length).
    pub fn prefix(&self, level: u32) -> &[Button] {
        let end = (level as usize).min(self.steps.len());
        &self.steps[..end]
    }

    pub fn steps(&self) -> &[Button] {
        &self.steps
    }
}
