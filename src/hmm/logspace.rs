//! Log-space arithmetic shared by the distribution getters.
//!
//! Zero probability is [`LOG_ZERO`] (`-inf`). It is absorbing under `+`
//! (products in probability space) and the identity of [`log_add`].

pub type LogProb = f64;

pub const LOG_ZERO: LogProb = f64::NEG_INFINITY;

#[inline]
pub fn is_log_zero(x: LogProb) -> bool {
    x == LOG_ZERO
}

/// `ln(x)` for a non-negative mass, with `x <= 0` mapped to [`LOG_ZERO`].
#[inline]
pub fn ln_mass(x: f64) -> LogProb {
    if x > 0.0 {
        x.ln()
    } else {
        LOG_ZERO
    }
}

/// `ln(exp(a) + exp(b))` without leaving log space.
#[inline]
pub fn log_add(a: LogProb, b: LogProb) -> LogProb {
    if is_log_zero(a) {
        return b;
    }
    if is_log_zero(b) {
        return a;
    }
    let (hi, lo) = if a > b { (a, b) } else { (b, a) };
    hi + (lo - hi).exp().ln_1p()
}

pub fn log_sum(xs: &[LogProb]) -> LogProb {
    xs.iter().copied().fold(LOG_ZERO, log_add)
}

/// Converts counts plus optional pseudo-counts into a log distribution.
///
/// `counts[i] + prior[i]` is divided by the total mass. An entry with no mass,
/// or every entry when the total is zero, is [`LOG_ZERO`].
pub fn log_normalize(counts: &[f64], total: f64, prior: Option<(&[f64], f64)>) -> Vec<LogProb> {
    let (prior, prior_total) = match prior {
        Some((p, t)) => (Some(p), t),
        None => (None, 0.0),
    };
    let log_total = ln_mass(total + prior_total);
    if is_log_zero(log_total) {
        return vec![LOG_ZERO; counts.len()];
    }
    counts
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let mass = c + prior.map_or(0.0, |p| p[i]);
            let lp = ln_mass(mass);
            if is_log_zero(lp) {
                LOG_ZERO
            } else {
                lp - log_total
            }
        })
        .collect()
}
