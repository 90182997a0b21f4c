//! Serializable sequence description, compiled into a [`Sequence`].
//!
//! ```yaml
//! - decl: service
//!   elements: [init]
//!   forward: [Domain]
//! - decl: service
//!   elements: [method]
//!   with:
//!     - { Method: Get }
//!     - { Method: List }
//! - select:
//!     decl: handler
//!     cases:
//!       rest: [{ decl: routes, elements: [rest] }]
//!       grpc: []
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    args::Args,
    error::DomainError,
    sequence::{Branch, Sequence},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequencePlan {
    pub steps: Vec<PlanStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    #[serde(default)]
    pub decl: String,
    #[serde(default)]
    pub elements: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forward: Vec<String>,
    /// One step per entry, each with its own args. Needs exactly one element.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub with: Vec<Args>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<PlanSelect>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanSelect {
    pub decl: String,
    pub cases: BTreeMap<String, Vec<PlanStep>>,
}

/// Builder surface shared by [`Sequence`] and [`Branch`].
trait PlanTarget {
    fn append_all(&mut self, decl: &str, elements: &[String]);
    fn append_args(&mut self, decl: &str, element: &str, with: Vec<Args>);
    fn forward_names(&mut self, names: &[String]);
    fn select_cases(&mut self, select: &PlanSelect) -> Result<(), DomainError>;
}

macro_rules! impl_extend {
    ($ty:ty) => {
        impl PlanTarget for $ty {
            fn append_all(&mut self, decl: &str, elements: &[String]) {
                self.append(decl, elements);
            }

            fn append_args(&mut self, decl: &str, element: &str, with: Vec<Args>) {
                self.append_with(decl, element, with);
            }

            fn forward_names(&mut self, names: &[String]) {
                self.forward(names);
            }

            fn select_cases(&mut self, select: &PlanSelect) -> Result<(), DomainError> {
                let keys: Vec<&String> = select.cases.keys().collect();
                let mut result = Ok(());
                self.select(&select.decl, &keys, |sw| {
                    for (case, steps) in &select.cases {
                        if result.is_err() || steps.is_empty() {
                            continue;
                        }
                        sw.when(case, |branch| {
                            result = apply_steps(branch, steps);
                        });
                    }
                });
                result
            }
        }
    };
}

impl_extend!(Sequence);
impl_extend!(Branch<'_>);

impl SequencePlan {
    /// Build the sequence.
    ///
    /// # Errors
    ///
    /// `InvalidPlan` when the plan is empty, does not open with a concrete
    /// step, or a step is malformed.
    pub fn compile(&self) -> Result<Sequence, DomainError> {
        let (first, rest) = self
            .steps
            .split_first()
            .ok_or_else(|| DomainError::InvalidPlan("plan has no steps".into()))?;

        check_step(first)?;
        let mut seq = if let Some((args, more)) = first.with.split_first() {
            let mut seq = Sequence::with_args(&first.decl, &first.elements[0], args.clone());
            seq.append_with(&first.decl, &first.elements[0], more.to_vec());
            seq
        } else {
            let (root, more) = first
                .elements
                .split_first()
                .ok_or_else(|| DomainError::InvalidPlan("first step needs an element".into()))?;
            let mut seq = Sequence::new(&first.decl, root);
            seq.append(&first.decl, more);
            seq
        };
        seq.forward_names(&first.forward);
        if let Some(select) = &first.select {
            seq.select_cases(select)?;
        }

        apply_steps(&mut seq, rest)?;
        Ok(seq)
    }
}

fn check_step(step: &PlanStep) -> Result<(), DomainError> {
    if !step.elements.is_empty() && step.decl.trim().is_empty() {
        return Err(DomainError::InvalidPlan(format!(
            "step with elements [{}] has no decl",
            step.elements.join(", ")
        )));
    }
    if !step.with.is_empty() && step.elements.len() != 1 {
        return Err(DomainError::InvalidPlan(format!(
            "'{}': `with` needs exactly one element",
            step.decl
        )));
    }
    if step.elements.is_empty() && step.select.is_none() {
        return Err(DomainError::InvalidPlan(format!(
            "'{}': step needs elements or a select",
            step.decl
        )));
    }
    match &step.select {
        Some(select) if select.decl.trim().is_empty() || select.cases.is_empty() => Err(
            DomainError::InvalidPlan("select needs a decl and at least one case".into()),
        ),
        _ => Ok(()),
    }
}

fn apply_steps<T: PlanTarget>(target: &mut T, steps: &[PlanStep]) -> Result<(), DomainError> {
    for step in steps {
        check_step(step)?;
        if step.with.is_empty() {
            target.append_all(&step.decl, &step.elements);
        } else {
            target.append_args(&step.decl, &step.elements[0], step.with.clone());
        }
        target.forward_names(&step.forward);
        if let Some(select) = &step.select {
            target.select_cases(select)?;
        }
    }
    Ok(())
}
