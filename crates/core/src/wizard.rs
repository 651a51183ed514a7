//! Relocation intake wizard: step definitions and the step controller.
//!
//! The wizard is one parameterized state machine over numbered steps
//! `1..=N` plus a terminal `PlanShown` state. [`WizardConfig`] selects the
//! step list (five-step or four-step variant), the selection limits, and
//! whether the personal-details gate is enforced.
//!
//! [`StepController`] keeps the raw step index unbounded (it always equals
//! `1 + #next - #back` from where it started, saturating at the `i32`
//! bounds) and clamps it into `[1, N]`
//! only when a step definition is looked up for rendering.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::form::{validate_form, validate_update, FieldUpdate, FormData, SelectionLimits};
use crate::progress::{ProgressAdapter, ProgressStore};
use crate::session::SessionContext;

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Destination,
    Passport,
    Personal,
    Budget,
    Profession,
}

impl StepKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Destination => "Where do you want to move?",
            Self::Passport => "Which passports do you hold?",
            Self::Personal => "Tell us about yourself",
            Self::Budget => "Budget and timeline",
            Self::Profession => "What do you do?",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Destination => "Pick up to three destination countries.",
            Self::Passport => "Your citizenships decide which visa routes are open.",
            Self::Personal => "Marital status and children shape the family visa options.",
            Self::Budget => "A rough budget and how soon you want to move.",
            Self::Profession => "Your profession and, if relevant, your partner's.",
        }
    }
}

/// One numbered step as presented to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepDefinition {
    pub number: i32,
    pub kind: StepKind,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardVariant {
    FiveStep,
    FourStep,
}

impl WizardVariant {
    /// Parse a variant name from configuration.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim() {
            "five_step" | "5" => Ok(Self::FiveStep),
            "four_step" | "4" => Ok(Self::FourStep),
            other => Err(CoreError::Validation(format!(
                "Invalid wizard variant '{other}'. Must be one of: five_step, four_step"
            ))),
        }
    }

    pub fn kinds(self) -> &'static [StepKind] {
        match self {
            Self::FiveStep => &[
                StepKind::Destination,
                StepKind::Passport,
                StepKind::Personal,
                StepKind::Budget,
                StepKind::Profession,
            ],
            Self::FourStep => &[
                StepKind::Destination,
                StepKind::Passport,
                StepKind::Personal,
                StepKind::Profession,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardConfig {
    pub variant: WizardVariant,
    pub steps: Vec<StepDefinition>,
    pub require_personal_details: bool,
    pub limits: SelectionLimits,
}

impl WizardConfig {
    pub fn new(variant: WizardVariant, require_personal_details: bool) -> Self {
        let steps = variant
            .kinds()
            .iter()
            .zip(1..)
            .map(|(&kind, number)| StepDefinition {
                number,
                kind,
                title: kind.title(),
                description: kind.description(),
            })
            .collect();
        Self {
            variant,
            steps,
            require_personal_details,
            limits: SelectionLimits::default(),
        }
    }

    pub fn total_steps(&self) -> i32 {
        self.steps.len() as i32
    }

    /// Clamp a raw step index into `[1, total_steps]`.
    pub fn clamp_step(&self, raw: i32) -> i32 {
        raw.clamp(1, self.total_steps().max(1))
    }

    pub fn step_at(&self, raw: i32) -> &StepDefinition {
        &self.steps[(self.clamp_step(raw) - 1) as usize]
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self::new(WizardVariant::FiveStep, false)
    }
}

// ---------------------------------------------------------------------------
// Outcomes and snapshots
// ---------------------------------------------------------------------------

/// Result of a persistence attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistOutcome {
    Saved,
    /// Nothing was written: no identity, or nothing changed.
    Skipped,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NextOutcome {
    Advanced { persisted: PersistOutcome },
    SignInRequired,
    Blocked { missing: Vec<&'static str> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    pub persisted: PersistOutcome,
}

/// Client-held wizard state, sent back with every wizard request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardSnapshot {
    #[serde(default = "first_step")]
    pub step: i32,
    #[serde(default)]
    pub form_data: FormData,
    #[serde(default)]
    pub plan_shown: bool,
}

fn first_step() -> i32 {
    1
}

impl Default for WizardSnapshot {
    fn default() -> Self {
        Self {
            step: first_step(),
            form_data: FormData::default(),
            plan_shown: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct StepController<'a> {
    config: &'a WizardConfig,
    session: &'a SessionContext,
    progress: ProgressAdapter<'a>,
    step: i32,
    form_data: FormData,
    plan_shown: bool,
    dirty: bool,
}

impl<'a> StepController<'a> {
    /// A fresh controller at step 1 with empty form data.
    pub fn new(
        config: &'a WizardConfig,
        session: &'a SessionContext,
        store: &'a dyn ProgressStore,
    ) -> Self {
        Self::build(config, session, store, WizardSnapshot::default())
    }

    /// Resume from client-held state. The snapshot's form data goes through
    /// the same checks as a field update before anything can persist it.
    pub fn from_snapshot(
        config: &'a WizardConfig,
        session: &'a SessionContext,
        store: &'a dyn ProgressStore,
        snapshot: WizardSnapshot,
    ) -> Result<Self, CoreError> {
        validate_form(&snapshot.form_data, &config.limits)?;
        Ok(Self::build(config, session, store, snapshot))
    }

    fn build(
        config: &'a WizardConfig,
        session: &'a SessionContext,
        store: &'a dyn ProgressStore,
        snapshot: WizardSnapshot,
    ) -> Self {
        Self {
            config,
            session,
            progress: ProgressAdapter::new(store),
            step: snapshot.step,
            form_data: snapshot.form_data,
            plan_shown: snapshot.plan_shown,
            dirty: false,
        }
    }

    /// Start from saved progress when signed in, otherwise from step 1.
    ///
    /// A saved step of 0 (nothing saved yet) starts at step 1.
    pub async fn restore(
        config: &'a WizardConfig,
        session: &'a SessionContext,
        store: &'a dyn ProgressStore,
    ) -> Self {
        let mut controller = Self::new(config, session, store);
        if let Some(identity) = session.identity() {
            let saved = controller.progress.load(identity.id).await;
            if saved.current_step > 0 {
                controller.step = saved.current_step;
            }
            controller.form_data = saved.form_data;
        }
        controller
    }

    /// Advance one step. Requires a signed-in identity.
    pub async fn next(&mut self) -> Result<NextOutcome, CoreError> {
        self.ensure_numbered()?;
        if !self.session.is_signed_in() {
            return Ok(NextOutcome::SignInRequired);
        }
        if self.config.require_personal_details
            && self.current_definition().kind == StepKind::Personal
        {
            let missing = self.form_data.missing_personal_details();
            if !missing.is_empty() {
                return Ok(NextOutcome::Blocked { missing });
            }
        }

        self.step = self.step.saturating_add(1);
        let persisted = self.persist().await;
        tracing::debug!(step = self.step, ?persisted, "Wizard advanced");
        Ok(NextOutcome::Advanced { persisted })
    }

    /// Retreat one step. Persists only when signed in.
    pub async fn back(&mut self) -> Result<PersistOutcome, CoreError> {
        self.ensure_numbered()?;
        self.step = self.step.saturating_sub(1);
        Ok(self.persist().await)
    }

    /// Validate and merge one field. Nothing is written until [`commit`].
    ///
    /// [`commit`]: StepController::commit
    pub fn update(&mut self, update: FieldUpdate) -> Result<(), CoreError> {
        self.ensure_numbered()?;
        validate_update(&update, &self.config.limits)?;
        self.form_data.apply(update);
        self.dirty = true;
        Ok(())
    }

    /// Write pending field updates. Signed-out users keep their edits in the
    /// returned snapshot only.
    pub async fn commit(&mut self) -> PersistOutcome {
        if !self.dirty {
            return PersistOutcome::Skipped;
        }
        self.persist().await
    }

    /// Move from the final step into the plan view.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, CoreError> {
        self.ensure_numbered()?;
        let total = self.config.total_steps();
        if self.current_step() != total {
            return Err(CoreError::Validation(format!(
                "The plan can only be requested from step {total}"
            )));
        }
        let persisted = self.persist().await;
        self.plan_shown = true;
        Ok(SubmitOutcome { persisted })
    }

    /// Clamped step, as used for rendering.
    pub fn current_step(&self) -> i32 {
        self.config.clamp_step(self.step)
    }

    pub fn total_steps(&self) -> i32 {
        self.config.total_steps()
    }

    pub fn raw_step(&self) -> i32 {
        self.step
    }

    pub fn current_definition(&self) -> &'a StepDefinition {
        self.config.step_at(self.step)
    }

    pub fn form_data(&self) -> &FormData {
        &self.form_data
    }

    pub fn is_plan_shown(&self) -> bool {
        self.plan_shown
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            step: self.step,
            form_data: self.form_data.clone(),
            plan_shown: self.plan_shown,
        }
    }

    fn ensure_numbered(&self) -> Result<(), CoreError> {
        if self.plan_shown {
            return Err(CoreError::Validation(
                "The plan has already been shown; start a new wizard to make changes".into(),
            ));
        }
        Ok(())
    }

    async fn persist(&mut self) -> PersistOutcome {
        let Some(identity) = self.session.identity() else {
            return PersistOutcome::Skipped;
        };
        if self.progress.save(identity.id, self.step, &self.form_data).await {
            self.dirty = false;
            PersistOutcome::Saved
        } else {
            PersistOutcome::Failed
        }
    }
}
