use crate::error::ConstructionError;
use crate::network::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Excitatory,
    Inhibitory,
}

impl Sign {
    pub fn factor(self) -> f32 {
        match self {
            Sign::Excitatory => 1.0,
            Sign::Inhibitory => -1.0,
        }
    }
}

/// Weight, time constant and sign of a synapse. The one value every wiring
/// stage passes to `NetworkBuilder::connect`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynapseSpec {
    pub weight: f32,
    /// Low-pass time constant in seconds. 0 passes the source output through.
    pub tau: f32,
    pub sign: Sign,
}

impl SynapseSpec {
    pub const fn new(weight: f32, tau: f32, sign: Sign) -> Self {
        Self { weight, tau, sign }
    }

    pub const fn excitatory(weight: f32, tau: f32) -> Self {
        Self::new(weight, tau, Sign::Excitatory)
    }

    pub const fn inhibitory(weight: f32, tau: f32) -> Self {
        Self::new(weight, tau, Sign::Inhibitory)
    }

    pub fn validate(&self) -> Result<(), ConstructionError> {
        if !self.tau.is_finite() || self.tau < 0.0 {
            return Err(ConstructionError::InvalidTau(self.tau));
        }
        if !self.weight.is_finite() {
            return Err(ConstructionError::InvalidWeight(self.weight));
        }
        Ok(())
    }

    /// `sign * weight`, the factor applied to the filtered value.
    pub fn gain(&self) -> f32 {
        self.sign.factor() * self.weight
    }
}

/// Per-tick smoothing coefficient `dt / tau`, capped at 1.
///
/// Stays in `(0, 1]`, so the filter approaches its input without overshoot.
/// `tau = 0` yields 1: the filtered value equals the input.
#[inline]
pub fn filter_alpha(dt: f32, tau: f32) -> f32 {
    if tau <= 0.0 { 1.0 } else { (dt / tau).min(1.0) }
}

/// One first-order low-pass step.
#[inline]
pub fn filter_step(f: f32, input: f32, alpha: f32) -> f32 {
    f + alpha * (input - f)
}

/// Read-only view of an incoming synapse, handed out to renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynapseRef {
    pub source: NodeId,
    pub spec: SynapseSpec,
    pub filtered: f32,
}

impl SynapseRef {
    pub fn contribution(&self) -> f32 {
        self.spec.gain() * self.filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_tau() {
        let spec = SynapseSpec::excitatory(1.0, -0.5);
        assert_eq!(spec.validate(), Err(ConstructionError::InvalidTau(-0.5)));
        assert!(SynapseSpec::inhibitory(f32::NAN, 1.0).validate().is_err());
        assert!(SynapseSpec::inhibitory(0.3, 0.0).validate().is_ok());
    }

    #[test]
    fn zero_tau_passes_through() {
        let alpha = filter_alpha(0.01, 0.0);
        assert_eq!(filter_step(3.0, 7.5, alpha), 7.5);
    }

    #[test]
    fn filter_converges_without_overshoot() {
        let alpha = filter_alpha(0.01, 0.5);
        let mut f = 0.0;
        let mut last_gap = f32::MAX;
        for _ in 0..2000 {
            f = filter_step(f, 4.0, alpha);
            let gap = 4.0 - f;
            assert!(gap >= 0.0);
            assert!(gap <= last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 1e-3);
    }

    #[test]
    fn alpha_is_capped() {
        assert_eq!(filter_alpha(0.1, 0.01), 1.0);
    }
}
