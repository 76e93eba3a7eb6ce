//! Selections (`spec.md` §4.2): a predicate applied to a lazily
//! resolved source set, producing both a filtered set and its
//! powerset cardinality-constrained subsets.

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use itertools::Itertools;

use crate::{error::ContfxError, expression::EvalContext, ids::EntityId};

type SourceFn = Rc<dyn Fn(&EvalContext) -> Vec<EntityId>>;
type AtomicTest = Rc<dyn Fn(&EvalContext, EntityId) -> bool>;

#[derive(Clone)]
pub enum Predicate {
    Atomic {
        name: &'static str,
        test: AtomicTest,
        cache: Rc<RefCell<HashMap<EntityId, bool>>>,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self.cache_key())
    }
}

impl Predicate {
    pub fn atomic(name: &'static str, test: impl Fn(&EvalContext, EntityId) -> bool + 'static) -> Self {
        Predicate::Atomic {
            name,
            test: Rc::new(test),
            cache: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Errs rather than silently producing a predicate that matches
    /// nothing, since an empty conjunction is almost always an authoring
    /// mistake (`spec.md` §7).
    pub fn and(predicates: impl IntoIterator<Item = Predicate>) -> Result<Self, ContfxError> {
        let predicates: Vec<_> = predicates.into_iter().collect();
        if predicates.is_empty() {
            return Err(ContfxError::Authoring("and() with no predicates".to_string()));
        }
        Ok(Predicate::And(predicates))
    }

    pub fn or(predicates: impl IntoIterator<Item = Predicate>) -> Result<Self, ContfxError> {
        let predicates: Vec<_> = predicates.into_iter().collect();
        if predicates.is_empty() {
            return Err(ContfxError::Authoring("or() with no predicates".to_string()));
        }
        Ok(Predicate::Or(predicates))
    }

    /// Composed predicates are cached by a sorted-name key so two
    /// conjunctions built from the same sub-predicates in different
    /// authoring order share a cache key (`spec.md` §4.2).
    pub fn cache_key(&self) -> String {
        match self {
            Predicate::Atomic { name, .. } => name.to_string(),
            Predicate::And(ps) => {
                let mut names: Vec<_> = ps.iter().map(Predicate::cache_key).collect();
                names.sort();
                format!("and({})", names.join(","))
            }
            Predicate::Or(ps) => {
                let mut names: Vec<_> = ps.iter().map(Predicate::cache_key).collect();
                names.sort();
                format!("or({})", names.join(","))
            }
        }
    }

    pub fn test(&self, ctx: &EvalContext, entity: EntityId) -> bool {
        match self {
            Predicate::Atomic { test, cache, .. } => {
                if let Some(hit) = cache.borrow().get(&entity) {
                    return *hit;
                }
                let result = test(ctx, entity);
                cache.borrow_mut().insert(entity, result);
                result
            }
            Predicate::And(ps) => ps.iter().all(|p| p.test(ctx, entity)),
            Predicate::Or(ps) => ps.iter().any(|p| p.test(ctx, entity)),
        }
    }

    fn invalidate_cache(&self) {
        match self {
            Predicate::Atomic { cache, .. } => cache.borrow_mut().clear(),
            Predicate::And(ps) | Predicate::Or(ps) => ps.iter().for_each(Predicate::invalidate_cache),
        }
    }
}

pub struct Selection {
    source: SourceFn,
    predicate: Predicate,
    min_size: usize,
    max_size: Option<usize>,
    /// Locking variant: caches the first `filter()` result. Explicitly
    /// invalidated by the manager at the start of a snapshot and after
    /// each layer that may have changed type characteristics
    /// (`spec.md` §4.2).
    cache: RefCell<Option<Vec<EntityId>>>,
}

impl Selection {
    pub fn new(source: impl Fn(&EvalContext) -> Vec<EntityId> + 'static, predicate: Predicate) -> Self {
        Self {
            source: Rc::new(source),
            predicate,
            min_size: 0,
            max_size: None,
            cache: RefCell::new(None),
        }
    }

    /// A selection whose source set is the single given entity, matched
    /// unconditionally. Used for effect components synthesized directly
    /// against one object (e.g. marker-derived power/toughness deltas).
    pub fn single(entity: EntityId) -> Self {
        Self::new(
            move |_ctx| vec![entity],
            Predicate::atomic("single_entity", |_ctx, _e| true),
        )
    }

    pub fn with_size(mut self, min_size: usize, max_size: Option<usize>) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    pub fn filter(&self, ctx: &EvalContext) -> Vec<EntityId> {
        if let Some(cached) = self.cache.borrow().as_ref() {
            return cached.clone();
        }
        let filtered: Vec<EntityId> = (self.source)(ctx)
            .into_iter()
            .filter(|e| self.predicate.test(ctx, *e))
            .collect();
        *self.cache.borrow_mut() = Some(filtered.clone());
        filtered
    }

    pub fn invalidate_cache(&self) {
        *self.cache.borrow_mut() = None;
        self.predicate.invalidate_cache();
    }

    pub fn cardinality(&self, ctx: &EvalContext) -> usize {
        self.filter(ctx).len()
    }

    pub fn threshold(&self, ctx: &EvalContext, op: crate::expression::BinOp, n: usize) -> bool {
        let count = self.cardinality(ctx) as i64;
        use crate::expression::BinOp::*;
        match op {
            Eq => count == n as i64,
            Ne => count != n as i64,
            Lt => count < n as i64,
            Le => count <= n as i64,
            Gt => count > n as i64,
            Ge => count >= n as i64,
            _ => false,
        }
    }

    /// Subsets of the filtered set whose cardinality lies in
    /// `[min_size, max_size]`; `max_size = None` means `|filtered|`.
    pub fn powerset(&self, ctx: &EvalContext) -> Vec<Vec<EntityId>> {
        let filtered = self.filter(ctx);
        let max = self.max_size.unwrap_or(filtered.len()).min(filtered.len());
        let min = self.min_size.min(max);
        (min..=max)
            .flat_map(|k| filtered.iter().copied().combinations(k))
            .collect()
    }
}
