//! Question catalog: the qualifier plus one ordered question list per path.
//!
//! The catalog is read-only once built. Construction checks the structure the
//! flow relies on: every path is present, every path has the same number of
//! questions (so the progress bar reads the same before and after a path is
//! chosen), option values are unique within a question, and every qualifier
//! option names a path.

mod data;
pub mod model;

use std::collections::{BTreeMap, HashSet};

pub use model::{PathType, Question, QuestionOption};

use crate::error::CatalogError;

/// Id recorded for the qualifier answer.
pub const QUALIFIER_ID: &str = "qualifier";

#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    qualifier: Question,
    paths: BTreeMap<PathType, Vec<Question>>,
    questions_per_path: usize,
}

impl QuestionCatalog {
    /// Build and validate a catalog.
    pub fn new(
        qualifier: Question,
        paths: BTreeMap<PathType, Vec<Question>>,
    ) -> Result<Self, CatalogError> {
        check_options(&qualifier)?;
        for option in &qualifier.options {
            if option.value.parse::<PathType>().is_err() {
                return Err(CatalogError::UnknownPath {
                    value: option.value.clone(),
                });
            }
        }

        let mut expected: Option<usize> = None;
        for path in PathType::ALL {
            let questions = paths.get(&path).ok_or_else(|| CatalogError::MissingPath {
                path: path.to_string(),
            })?;
            if questions.is_empty() {
                return Err(CatalogError::MissingPath {
                    path: path.to_string(),
                });
            }
            match expected {
                None => expected = Some(questions.len()),
                Some(n) if n != questions.len() => {
                    return Err(CatalogError::UnevenPaths {
                        path: path.to_string(),
                        expected: n,
                        actual: questions.len(),
                    });
                }
                Some(_) => {}
            }
            for question in questions {
                check_options(question)?;
            }
        }

        Ok(Self {
            qualifier,
            paths,
            questions_per_path: expected.unwrap_or_default(),
        })
    }

    /// The vision-care question set, checked like any other catalog.
    pub fn reference() -> Result<Self, CatalogError> {
        let paths = PathType::ALL
            .into_iter()
            .map(|p| (p, data::path_questions(p)))
            .collect();
        Self::new(data::qualifier(), paths)
    }

    pub fn qualifier(&self) -> &Question {
        &self.qualifier
    }

    pub fn questions(&self, path: PathType) -> &[Question] {
        self.paths.get(&path).map(Vec::as_slice).unwrap_or_default()
    }

    /// Shared question count of every path.
    pub fn questions_per_path(&self) -> usize {
        self.questions_per_path
    }
}

fn check_options(question: &Question) -> Result<(), CatalogError> {
    if question.options.is_empty() {
        return Err(CatalogError::NoOptions {
            question_id: question.id.clone(),
        });
    }
    let mut seen = HashSet::new();
    for option in &question.options {
        if !seen.insert(option.value.as_str()) {
            return Err(CatalogError::DuplicateOption {
                question_id: question.id.clone(),
                value: option.value.clone(),
            });
        }
    }
    Ok(())
}
