//! Conversion path search.
//!
//! A plan is an ordered chain of 1–4 catalog steps whose endpoints link the
//! requested source format to the target format. The search tries direct
//! steps first, then progressively longer chains, in catalog declaration
//! order; the first chain found wins. Any pair not connected within four
//! steps has no conversion at all — the catalog is built so four hops reach
//! everything reachable.

use alloc::vec::Vec;

use super::catalog::{CATALOG, ConversionStep};
use crate::pixel::PixelFormat;

/// An ordered chain of conversion steps from one pixel format to another.
///
/// The empty plan is the identity conversion.
#[derive(Clone, Debug)]
pub struct Plan {
    source: PixelFormat,
    target: PixelFormat,
    steps: Vec<&'static ConversionStep>,
}

impl Plan {
    pub(crate) fn identity(format: PixelFormat) -> Plan {
        Plan {
            source: format,
            target: format,
            steps: Vec::new(),
        }
    }

    pub(crate) fn from_steps(
        source: PixelFormat,
        target: PixelFormat,
        steps: Vec<&'static ConversionStep>,
    ) -> Plan {
        debug_assert!(steps.len() <= MAX_PLAN_STEPS);
        Plan {
            source,
            target,
            steps,
        }
    }

    pub fn source(&self) -> PixelFormat {
        self.source
    }

    pub fn target(&self) -> PixelFormat {
        self.target
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether every step preserves pixel size (no buffer reallocation).
    pub fn is_in_place(&self) -> bool {
        self.steps.iter().all(|s| s.is_in_place())
    }

    /// The (source, target) endpoints of each step, in execution order.
    pub fn steps(&self) -> impl Iterator<Item = (PixelFormat, PixelFormat)> + '_ {
        self.steps.iter().map(|s| (s.source, s.target))
    }

    pub(crate) fn raw_steps(&self) -> &[&'static ConversionStep] {
        &self.steps
    }
}

/// Longest chain the planner will search for.
pub(crate) const MAX_PLAN_STEPS: usize = 4;

/// Search the catalog for a chain of at most four steps.
///
/// `source != target` is assumed (the identity plan never reaches here).
/// Every intermediate format must keep at least
/// `min(source components, target components)` — a chain may not route
/// through a format that discards a channel the endpoint formats share.
pub(crate) fn find_plan(source: PixelFormat, target: PixelFormat) -> Option<Plan> {
    let floor = source.component_count().min(target.component_count());
    let keeps_floor = |f: PixelFormat| f.component_count() >= floor;

    // Direct step.
    for step in CATALOG {
        if step.source == source && step.target == target {
            return Some(Plan::from_steps(source, target, alloc::vec![step]));
        }
    }

    // Two steps: fix the last by target, find a first connecting to it.
    for b in CATALOG.iter().filter(|b| b.target == target) {
        if !keeps_floor(b.source) {
            continue;
        }
        for a in CATALOG {
            if a.source == source && a.target == b.source {
                return Some(Plan::from_steps(source, target, alloc::vec![a, b]));
            }
        }
    }

    // Three steps: fix first by source and last by target, search the middle.
    for a in CATALOG.iter().filter(|a| a.source == source) {
        if !keeps_floor(a.target) {
            continue;
        }
        for c in CATALOG.iter().filter(|c| c.target == target) {
            if !keeps_floor(c.source) {
                continue;
            }
            for b in CATALOG {
                if b.source == a.target && b.target == c.source {
                    return Some(Plan::from_steps(source, target, alloc::vec![a, b, c]));
                }
            }
        }
    }

    // Four steps: fix first and last, search the two connecting middles.
    for a in CATALOG.iter().filter(|a| a.source == source) {
        if !keeps_floor(a.target) {
            continue;
        }
        for d in CATALOG.iter().filter(|d| d.target == target) {
            if !keeps_floor(d.source) {
                continue;
            }
            for b in CATALOG.iter().filter(|b| b.source == a.target) {
                if !keeps_floor(b.target) {
                    continue;
                }
                for c in CATALOG {
                    if c.source == b.target && c.target == d.source {
                        return Some(Plan::from_steps(source, target, alloc::vec![a, b, c, d]));
                    }
                }
            }
        }
    }

    None
}
