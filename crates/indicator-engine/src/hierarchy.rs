//! KRI → RI → PI/KPI hierarchy assembly.
//!
//! Indicators only hold a parent id; the tree is a derived view built on
//! demand. A parent reference that does not resolve is treated as "no parent"
//! and the indicator is reported as standalone.

use std::collections::{HashMap, HashSet};

use indicator_types::{Indicator, IndicatorId, IndicatorKind};
use serde::Serialize;
use tracing::debug;

/// A KRI with the RIs that report to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyResultNode {
    pub indicator: Indicator,
    pub results: Vec<ResultNode>,
}

/// An RI with the PIs and KPIs that report to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultNode {
    pub indicator: Indicator,
    pub performance: Vec<Indicator>,
}

/// The assembled hierarchy. Every input indicator appears exactly once.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorHierarchy {
    /// KRIs with their nested RIs and PIs
    pub rooted: Vec<KeyResultNode>,

    /// RIs whose parent KRI is absent or unresolvable, with their PIs
    pub standalone_ris: Vec<ResultNode>,

    /// PIs whose parent RI is absent or unresolvable
    pub standalone_pis: Vec<Indicator>,
}

impl IndicatorHierarchy {
    /// Total number of indicators placed in the hierarchy.
    pub fn len(&self) -> usize {
        let results = |nodes: &[ResultNode]| -> usize {
            nodes.iter().map(|r| 1 + r.performance.len()).sum()
        };
        self.rooted
            .iter()
            .map(|k| 1 + results(&k.results))
            .sum::<usize>()
            + results(&self.standalone_ris)
            + self.standalone_pis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: IndicatorId) -> bool {
        self.indicator_ids().any(|i| i == id)
    }

    /// Ids of every placed indicator, depth first.
    pub fn indicator_ids(&self) -> impl Iterator<Item = IndicatorId> + '_ {
        let rooted = self.rooted.iter().flat_map(|k| {
            std::iter::once(k.indicator.id).chain(k.results.iter().flat_map(result_ids))
        });
        rooted
            .chain(self.standalone_ris.iter().flat_map(result_ids))
            .chain(self.standalone_pis.iter().map(|p| p.id))
    }
}

fn result_ids(node: &ResultNode) -> impl Iterator<Item = IndicatorId> + '_ {
    std::iter::once(node.indicator.id).chain(node.performance.iter().map(|p| p.id))
}

/// Assemble the hierarchy from indicators already split by kind.
///
/// `pis` accepts both PIs and KPIs. Input order is preserved inside every
/// level; a duplicated id is kept at its first occurrence only.
pub fn assemble_hierarchy(
    kris: &[Indicator],
    ris: &[Indicator],
    pis: &[Indicator],
) -> IndicatorHierarchy {
    let mut seen = HashSet::new();
    let kris: Vec<&Indicator> = kris.iter().filter(|i| seen.insert(i.id)).collect();
    let ris: Vec<&Indicator> = ris.iter().filter(|i| seen.insert(i.id)).collect();
    let pis: Vec<&Indicator> = pis.iter().filter(|i| seen.insert(i.id)).collect();

    // PIs grouped under RIs that exist; the rest are standalone.
    let ri_ids: HashSet<IndicatorId> = ris.iter().map(|r| r.id).collect();
    let mut performance_by_ri: HashMap<IndicatorId, Vec<Indicator>> = HashMap::new();
    let mut standalone_pis = Vec::new();
    for pi in pis {
        match pi.parent_id.filter(|p| ri_ids.contains(p)) {
            Some(parent) => performance_by_ri.entry(parent).or_default().push(pi.clone()),
            None => standalone_pis.push(pi.clone()),
        }
    }

    let kri_ids: HashSet<IndicatorId> = kris.iter().map(|k| k.id).collect();
    let mut results_by_kri: HashMap<IndicatorId, Vec<ResultNode>> = HashMap::new();
    let mut standalone_ris = Vec::new();
    for ri in ris {
        let node = ResultNode {
            indicator: ri.clone(),
            performance: performance_by_ri.remove(&ri.id).unwrap_or_default(),
        };
        match ri.parent_id.filter(|p| kri_ids.contains(p)) {
            Some(parent) => results_by_kri.entry(parent).or_default().push(node),
            None => standalone_ris.push(node),
        }
    }

    let rooted: Vec<KeyResultNode> = kris
        .into_iter()
        .map(|kri| KeyResultNode {
            indicator: kri.clone(),
            results: results_by_kri.remove(&kri.id).unwrap_or_default(),
        })
        .collect();

    debug!(
        rooted = rooted.len(),
        standalone_ris = standalone_ris.len(),
        standalone_pis = standalone_pis.len(),
        "Hierarchy assembled"
    );

    IndicatorHierarchy {
        rooted,
        standalone_ris,
        standalone_pis,
    }
}

/// Partition a mixed collection by kind and assemble it.
pub fn hierarchy_from_indicators<'a>(
    indicators: impl IntoIterator<Item = &'a Indicator>,
) -> IndicatorHierarchy {
    let mut kris = Vec::new();
    let mut ris = Vec::new();
    let mut pis = Vec::new();
    for indicator in indicators {
        match indicator.kind {
            IndicatorKind::Kri => kris.push(indicator.clone()),
            IndicatorKind::Ri => ris.push(indicator.clone()),
            IndicatorKind::Pi | IndicatorKind::Kpi => pis.push(indicator.clone()),
        }
    }
    assemble_hierarchy(&kris, &ris, &pis)
}
