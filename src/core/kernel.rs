/// Accumulation passes over the scratch buffer.
///
/// Every gate is executed as one or two *passes*. A pass visits each
/// destination index `j` of the scratch buffer exactly once, asks the gate
/// rule for the single source index and scalar feeding `j`, and accumulates
///
/// ```text
/// scratch[j] += scalar · current[source(j)]
/// ```
///
/// The current buffer is only read and the scratch buffer is only written,
/// so a destination slot is never read within the pass that writes it.
/// Because each worker owns a disjoint range of destinations, the pass can
/// be split across the rayon pool without atomics.
///
/// Two-destination gates (H, Rx, Ry) run a "stay" pass (`source = j`)
/// followed by a "swap" pass (`source = j ^ target_mask`). The first pass
/// finishes on every worker before the second begins.
use rayon::prelude::*;

use super::state::{Amplitude, ZERO};

/// Smallest destination range handed to one rayon task.
const MIN_CHUNK: usize = 1 << 10;

/// Execution path taken by a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Single-threaded loop on the caller's thread.
    Sequential,
    /// Destination range split across the rayon thread pool.
    Parallel,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Parallel => write!(f, "parallel"),
        }
    }
}

impl Backend {
    #[inline]
    pub fn select(parallel: bool) -> Self {
        if parallel {
            Self::Parallel
        } else {
            Self::Sequential
        }
    }
}

/// Run one pass. `rule(j)` returns `(source, scalar)` for destination `j`.
///
/// The rule must map destinations to sources bijectively within the pass.
/// Zero-amplitude sources are skipped.
pub(crate) fn accumulate<F>(
    current: &[Amplitude],
    scratch: &mut [Amplitude],
    backend: Backend,
    rule: F,
) where
    F: Fn(usize) -> (usize, Amplitude) + Sync,
{
    debug_assert_eq!(current.len(), scratch.len());

    let step = |(j, out): (usize, &mut Amplitude)| {
        let (source, scalar) = rule(j);
        let amp = current[source];
        if amp != ZERO {
            *out += scalar * amp;
        }
    };

    match backend {
        Backend::Sequential => scratch.iter_mut().enumerate().for_each(step),
        Backend::Parallel => scratch
            .par_iter_mut()
            .with_min_len(MIN_CHUNK)
            .enumerate()
            .for_each(step),
    }
}

/// Zero a buffer so it can serve as the next destination.
pub(crate) fn clear(buffer: &mut [Amplitude], backend: Backend) {
    match backend {
        Backend::Sequential => buffer.fill(ZERO),
        Backend::Parallel => buffer
            .par_iter_mut()
            .with_min_len(MIN_CHUNK)
            .for_each(|a| *a = ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::ONE;

    fn ramp(n: usize) -> Vec<Amplitude> {
        (0..n).map(|i| Amplitude::new(i as f64, -(i as f64))).collect()
    }

    #[test]
    fn test_identity_pass() {
        let current = ramp(8);
        let mut scratch = vec![ZERO; 8];
        accumulate(&current, &mut scratch, Backend::Sequential, |j| (j, ONE));
        assert_eq!(scratch, current);
    }

    #[test]
    fn test_pass_accumulates() {
        let current = ramp(4);
        let mut scratch = vec![ONE; 4];
        accumulate(&current, &mut scratch, Backend::Sequential, |j| {
            (j, Amplitude::new(2.0, 0.0))
        });
        for (j, out) in scratch.iter().enumerate() {
            assert_eq!(*out, ONE + current[j] * 2.0);
        }
    }

    #[test]
    fn test_swap_pass_relocates() {
        let current = ramp(4);
        let mut scratch = vec![ZERO; 4];
        accumulate(&current, &mut scratch, Backend::Sequential, |j| (j ^ 0b10, ONE));
        assert_eq!(scratch, vec![current[2], current[3], current[0], current[1]]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let n = 1 << 13;
        let current = ramp(n);
        let mut seq = vec![ZERO; n];
        let mut par = vec![ZERO; n];
        let rule = |j: usize| (j ^ 0b100, Amplitude::new(0.5, -0.25));
        accumulate(&current, &mut seq, Backend::Sequential, rule);
        accumulate(&current, &mut par, Backend::Parallel, rule);
        assert_eq!(seq, par);
    }

    #[test]
    fn test_clear() {
        let mut buffer = ramp(1 << 12);
        clear(&mut buffer, Backend::Parallel);
        assert!(buffer.iter().all(|a| *a == ZERO));
    }

    #[test]
    fn test_backend_select() {
        assert_eq!(Backend::select(true), Backend::Parallel);
        assert_eq!(Backend::select(false).to_string(), "sequential");
    }
}
