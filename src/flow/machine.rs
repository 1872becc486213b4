//! AssessmentFlow: the synchronous core of the questionnaire.
//!
//! No I/O happens here. `AssessmentSession` wraps it with the network and
//! timing concerns.

use std::sync::Arc;

use crate::catalog::{PathType, Question, QuestionCatalog, QUALIFIER_ID};
use crate::error::{Error, FlowError, ValidationError};
use crate::screen::{SYNCING_HEADLINE, Screen};
use crate::submission::AssessmentPayload;

use super::lead::{Answer, LeadData};
use super::result::ResultMessage;
use super::state::FlowStage;

/// The part of the flow that back-navigation must restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowPosition {
    pub stage: FlowStage,
    pub path: Option<PathType>,
    pub question_index: usize,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone)]
pub struct AssessmentFlow {
    catalog: Arc<QuestionCatalog>,
    stage: FlowStage,
    path: Option<PathType>,
    /// Index into the path's questions. Equals the question count in `Lead`.
    question_index: usize,
    answers: Vec<Answer>,
    lead: Option<LeadData>,
    submitting: bool,
    result: Option<ResultMessage>,
    not_now_taken: bool,
    /// A booking-intent ping is in flight.
    pinging: bool,
}

impl AssessmentFlow {
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self {
            catalog,
            stage: FlowStage::Qualifier,
            path: None,
            question_index: 0,
            answers: Vec::new(),
            lead: None,
            submitting: false,
            result: None,
            not_now_taken: false,
            pinging: false,
        }
    }

    pub fn stage(&self) -> FlowStage {
        self.stage
    }

    pub fn path(&self) -> Option<PathType> {
        self.path
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn lead(&self) -> Option<&LeadData> {
        self.lead.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn result(&self) -> Option<&ResultMessage> {
        self.result.as_ref()
    }

    pub fn not_now_taken(&self) -> bool {
        self.not_now_taken
    }

    pub fn position(&self) -> FlowPosition {
        FlowPosition {
            stage: self.stage,
            path: self.path,
            question_index: self.question_index,
            answers: self.answers.clone(),
        }
    }

    /// The question on screen, if the stage shows one.
    pub fn current_question(&self) -> Option<&Question> {
        match (self.stage, self.path) {
            (FlowStage::Qualifier, _) => Some(self.catalog.qualifier()),
            (FlowStage::Questions, Some(path)) => {
                self.catalog.questions(path).get(self.question_index)
            }
            _ => None,
        }
    }

    /// Question count plus the qualifier and lead steps.
    ///
    /// Before a path is chosen this uses the catalog's shared per-path count,
    /// which the catalog guarantees is the same for every path.
    pub fn total_steps(&self) -> usize {
        match self.path {
            Some(path) => self.catalog.questions(path).len() + 2,
            None => self.catalog.questions_per_path() + 2,
        }
    }

    pub fn current_step(&self) -> usize {
        match self.stage {
            FlowStage::Qualifier => 1,
            FlowStage::Questions => self.question_index + 2,
            FlowStage::Lead | FlowStage::Result => self.total_steps(),
        }
    }

    /// Record an answer for the question on screen.
    pub fn answer(&mut self, value: &str) -> Result<FlowStage, Error> {
        match self.stage {
            FlowStage::Qualifier => self.answer_qualifier(value),
            FlowStage::Questions => self.answer_question(value),
            stage => Err(FlowError::WrongStage {
                stage,
                action: "answer a question",
            }
            .into()),
        }
    }

    fn answer_qualifier(&mut self, value: &str) -> Result<FlowStage, Error> {
        let qualifier = self.catalog.qualifier();
        let path = match value.parse::<PathType>() {
            Ok(path) if qualifier.offers(value) => path,
            _ => {
                return Err(ValidationError::UnknownOption {
                    question_id: QUALIFIER_ID.to_string(),
                    value: value.to_string(),
                }
                .into());
            }
        };

        self.path = Some(path);
        self.answers = vec![Answer::new(QUALIFIER_ID, value)];
        self.question_index = 0;
        self.stage = FlowStage::Questions;
        Ok(self.stage)
    }

    fn answer_question(&mut self, value: &str) -> Result<FlowStage, Error> {
        let path = self.path.ok_or(FlowError::WrongStage {
            stage: self.stage,
            action: "answer without a path",
        })?;
        let questions = self.catalog.questions(path);
        let question = questions
            .get(self.question_index)
            .ok_or(FlowError::WrongStage {
                stage: self.stage,
                action: "answer past the last question",
            })?;
        if !question.offers(value) {
            return Err(ValidationError::UnknownOption {
                question_id: question.id.clone(),
                value: value.to_string(),
            }
            .into());
        }

        self.answers.push(Answer::new(question.id.clone(), value));
        self.question_index += 1;
        if self.question_index >= questions.len() {
            self.stage = FlowStage::Lead;
        }
        Ok(self.stage)
    }

    /// Undo the most recent step.
    pub fn back(&mut self) -> Result<FlowStage, FlowError> {
        if self.submitting {
            return Err(FlowError::Busy);
        }
        match self.stage {
            FlowStage::Questions if self.question_index == 0 => {
                self.stage = FlowStage::Qualifier;
                self.path = None;
                self.answers.clear();
            }
            FlowStage::Questions => {
                self.question_index -= 1;
                self.answers.pop();
            }
            FlowStage::Lead => {
                self.stage = FlowStage::Questions;
                self.question_index = self.question_index.saturating_sub(1);
                self.answers.pop();
            }
            stage => {
                return Err(FlowError::WrongStage {
                    stage,
                    action: "go back",
                });
            }
        }
        Ok(self.stage)
    }

    /// Store the lead and enter the submitting sub-state.
    pub fn begin_submission(&mut self, lead: LeadData) -> Result<AssessmentPayload, FlowError> {
        if self.stage != FlowStage::Lead {
            return Err(FlowError::WrongStage {
                stage: self.stage,
                action: "submit contact details",
            });
        }
        if self.submitting {
            return Err(FlowError::Busy);
        }
        let path = self.path.ok_or(FlowError::WrongStage {
            stage: self.stage,
            action: "submit without a path",
        })?;

        let payload = AssessmentPayload::new(path, &self.answers, &lead);
        self.lead = Some(lead);
        self.submitting = true;
        Ok(payload)
    }

    /// Leave the submitting sub-state and show the result.
    pub fn finish_submission(&mut self, message: ResultMessage) -> Result<FlowStage, FlowError> {
        if !self.submitting || !self.stage.can_transition_to(FlowStage::Result) {
            return Err(FlowError::WrongStage {
                stage: self.stage,
                action: "finish a submission",
            });
        }
        self.submitting = false;
        self.result = Some(message);
        self.stage = FlowStage::Result;
        Ok(self.stage)
    }

    /// Claim the booking-intent ping. Only one may be in flight.
    pub fn begin_booking_intent(&mut self) -> Result<LeadData, FlowError> {
        let lead = match (self.stage, &self.lead) {
            (FlowStage::Result, Some(lead)) => lead.clone(),
            (stage, _) => {
                return Err(FlowError::WrongStage {
                    stage,
                    action: "book a consultation",
                });
            }
        };
        if self.pinging {
            return Err(FlowError::Busy);
        }
        self.pinging = true;
        Ok(lead)
    }

    pub fn finish_booking_intent(&mut self) {
        self.pinging = false;
    }

    /// Swap in the confirmation and hide the "not now" action.
    pub fn mark_not_now(&mut self) -> Result<(), FlowError> {
        if self.stage != FlowStage::Result {
            return Err(FlowError::WrongStage {
                stage: self.stage,
                action: "save results for later",
            });
        }
        if self.not_now_taken {
            return Err(FlowError::AlreadyAbandoned);
        }
        self.not_now_taken = true;
        self.result = Some(ResultMessage::AbandonedConfirmation);
        Ok(())
    }

    /// Render model for the current state.
    pub fn screen(&self) -> Screen {
        if self.submitting {
            return Screen::Syncing {
                headline: SYNCING_HEADLINE,
            };
        }
        match self.stage {
            FlowStage::Qualifier | FlowStage::Questions => match self.current_question() {
                Some(question) => Screen::Question {
                    question: question.clone(),
                    current_step: self.current_step(),
                    total_steps: self.total_steps(),
                    show_back: self.stage.allows_back(),
                },
                // `QuestionCatalog::new` rejects empty paths, so a path always
                // has a question at index 0 and `Lead` follows the last one.
                None => Screen::LeadForm {
                    current_step: self.current_step(),
                    total_steps: self.total_steps(),
                },
            },
            FlowStage::Lead => Screen::LeadForm {
                current_step: self.current_step(),
                total_steps: self.total_steps(),
            },
            FlowStage::Result => Screen::Result {
                message: self
                    .result
                    .as_ref()
                    .map(|m| m.text().to_string())
                    .unwrap_or_default(),
                first_name: self
                    .lead
                    .as_ref()
                    .map(|l| l.first_name.clone())
                    .unwrap_or_default(),
                show_not_now: !self.not_now_taken,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow() -> AssessmentFlow {
        AssessmentFlow::new(Arc::new(QuestionCatalog::reference().unwrap()))
    }

    fn first_option(flow: &AssessmentFlow) -> String {
        flow.current_question().unwrap().options[0].value.clone()
    }

    fn to_lead(path: PathType) -> AssessmentFlow {
        let mut f = flow();
        f.answer(path.as_str()).unwrap();
        while f.stage() == FlowStage::Questions {
            let v = first_option(&f);
            f.answer(&v).unwrap();
        }
        f
    }

    fn jane() -> LeadData {
        LeadData::new("Jane", "Doe", "jane@x.com").unwrap()
    }

    #[test]
    fn starts_at_qualifier() {
        let f = flow();
        assert_eq!(f.stage(), FlowStage::Qualifier);
        assert_eq!(f.current_question().unwrap().id, QUALIFIER_ID);
        assert_eq!(f.current_step(), 1);
        assert_eq!(f.total_steps(), 7);
        assert!(f.path().is_none());
    }

    #[test]
    fn qualifier_selects_path() {
        let mut f = flow();
        assert_eq!(f.answer("Cataract").unwrap(), FlowStage::Questions);
        assert_eq!(f.path(), Some(PathType::Cataract));
        assert_eq!(f.answers(), &[Answer::new("qualifier", "Cataract")]);
        assert_eq!(f.question_index(), 0);
        assert_eq!(f.current_question().unwrap().id, "cataract_q2");
        assert_eq!(f.current_step(), 2);
    }

    #[test]
    fn unknown_values_are_rejected_without_side_effects() {
        let mut f = flow();
        assert!(matches!(
            f.answer("Glaucoma"),
            Err(Error::Validation(ValidationError::UnknownOption { .. }))
        ));
        assert_eq!(f.position(), flow().position());

        f.answer("LaserEye").unwrap();
        let before = f.position();
        assert!(f.answer("definitely-not-an-option").is_err());
        assert_eq!(f.position(), before);
    }

    #[test]
    fn answers_track_index_through_every_path() {
        for path in PathType::ALL {
            let mut f = flow();
            f.answer(path.as_str()).unwrap();
            while f.stage() == FlowStage::Questions {
                assert_eq!(f.answers().len(), f.question_index() + 1);
                assert_eq!(f.current_step(), f.question_index() + 2);
                let v = first_option(&f);
                f.answer(&v).unwrap();
            }
            assert_eq!(f.stage(), FlowStage::Lead);
            assert_eq!(f.answers().len(), 5 + 1);
            assert_eq!(f.total_steps(), 7);
            assert_eq!(f.current_step(), 7);
        }
    }

    #[test]
    fn answer_then_back_restores_position() {
        let mut f = flow();
        f.answer("DryEye").unwrap();
        for _ in 0..4 {
            let before = f.position();
            let v = first_option(&f);
            f.answer(&v).unwrap();
            f.back().unwrap();
            assert_eq!(f.position(), before);
            f.answer(&v).unwrap();
        }

        // Last question → Lead → back.
        let before = f.position();
        let v = first_option(&f);
        assert_eq!(f.answer(&v).unwrap(), FlowStage::Lead);
        assert_eq!(f.back().unwrap(), FlowStage::Questions);
        assert_eq!(f.position(), before);
        assert_eq!(f.current_question().unwrap().id, "dry_q6");
    }

    #[test]
    fn back_at_first_question_clears_path() {
        let mut f = flow();
        f.answer("ContactLens").unwrap();
        assert_eq!(f.back().unwrap(), FlowStage::Qualifier);
        assert!(f.path().is_none());
        assert!(f.answers().is_empty());
        assert_eq!(f.current_step(), 1);
    }

    #[test]
    fn back_is_refused_at_qualifier_and_result() {
        let mut f = flow();
        assert!(matches!(f.back(), Err(FlowError::WrongStage { .. })));

        let mut f = to_lead(PathType::LaserEye);
        f.begin_submission(jane()).unwrap();
        f.finish_submission(ResultMessage::Generated("ok".into())).unwrap();
        assert!(matches!(f.back(), Err(FlowError::WrongStage { .. })));
    }

    #[test]
    fn submitting_blocks_back_and_resubmit() {
        let mut f = to_lead(PathType::Cataract);
        let payload = f.begin_submission(jane()).unwrap();
        assert_eq!(payload.path, PathType::Cataract);
        assert_eq!(payload.answers.len(), 6);
        assert_eq!(payload.answers["qualifier"], "Cataract");

        assert!(f.is_submitting());
        assert_eq!(f.back(), Err(FlowError::Busy));
        assert_eq!(f.begin_submission(jane()), Err(FlowError::Busy));
        assert!(matches!(f.screen(), Screen::Syncing { .. }));
    }

    #[test]
    fn finish_requires_submission() {
        let mut f = to_lead(PathType::DryEye);
        assert!(f.finish_submission(ResultMessage::Generated("x".into())).is_err());

        f.begin_submission(jane()).unwrap();
        assert_eq!(
            f.finish_submission(ResultMessage::Generated("Custom result".into())),
            Ok(FlowStage::Result)
        );
        assert_eq!(f.current_step(), f.total_steps());
        assert_eq!(
            f.screen(),
            Screen::Result {
                message: "Custom result".into(),
                first_name: "Jane".into(),
                show_not_now: true,
            }
        );
    }

    #[test]
    fn not_now_is_one_shot() {
        let mut f = to_lead(PathType::DryEye);
        assert!(f.mark_not_now().is_err());
        f.begin_submission(jane()).unwrap();
        f.finish_submission(ResultMessage::Generated("x".into())).unwrap();

        f.mark_not_now().unwrap();
        assert!(f.result().unwrap().is_abandoned_confirmation());
        assert_eq!(f.mark_not_now(), Err(FlowError::AlreadyAbandoned));
        match f.screen() {
            Screen::Result { show_not_now, message, .. } => {
                assert!(!show_not_now);
                assert_eq!(message, super::super::result::ABANDONED_CONFIRMATION);
            }
            other => panic!("unexpected screen {other:?}"),
        }
    }

    #[test]
    fn booking_intent_is_exclusive_while_in_flight() {
        let mut f = to_lead(PathType::LaserEye);
        assert!(matches!(
            f.begin_booking_intent(),
            Err(FlowError::WrongStage { .. })
        ));
        f.begin_submission(jane()).unwrap();
        f.finish_submission(ResultMessage::Generated("x".into())).unwrap();

        assert_eq!(f.begin_booking_intent(), Ok(jane()));
        assert_eq!(f.begin_booking_intent(), Err(FlowError::Busy));
        f.finish_booking_intent();
        assert!(f.begin_booking_intent().is_ok());
    }

    #[test]
    fn question_screen_shows_back_only_after_qualifier() {
        let mut f = flow();
        assert!(matches!(f.screen(), Screen::Question { show_back: false, .. }));
        f.answer("LaserEye").unwrap();
        assert!(matches!(
            f.screen(),
            Screen::Question {
                show_back: true,
                current_step: 2,
                total_steps: 7,
                ..
            }
        ));
    }
}
