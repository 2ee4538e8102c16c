use std::fmt;

/// Named checkpoint in the processing pipeline. Display only; the server
/// never reports these directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepId {
    Upload,
    Transcription,
    Ocr,
    Correlation,
    Generation,
    Export,
}

impl StepId {
    pub fn label(self) -> &'static str {
        match self {
            StepId::Upload => "Receiving files",
            StepId::Transcription => "Parsing transcription",
            StepId::Ocr => "Reading screenshots",
            StepId::Correlation => "Correlating actions",
            StepId::Generation => "Generating documentation",
            StepId::Export => "Exporting documents",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub id: StepId,
    pub threshold: u8,
}

/// How a step renders for a given percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMark {
    Completed,
    Current,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Empty,
    /// Thresholds must be strictly increasing; `index` is the offender.
    NonIncreasing { index: usize },
    ThresholdOutOfRange { index: usize },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Empty => write!(f, "step catalog is empty"),
            CatalogError::NonIncreasing { index } => {
                write!(f, "step threshold at index {index} is not strictly increasing")
            }
            CatalogError::ThresholdOutOfRange { index } => {
                write!(f, "step threshold at index {index} exceeds 100")
            }
        }
    }
}

/// Fixed ordered list of steps with strictly increasing thresholds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCatalog {
    steps: Vec<Step>,
    window: u8,
}

impl StepCatalog {
    /// The pipeline the documentation service runs, on the default
    /// thresholds. Window 20: a step reads as current once progress is
    /// within 20 points below its threshold.
    pub fn standard() -> Self {
        let steps = vec![
            Step { id: StepId::Upload, threshold: 10 },
            Step { id: StepId::Transcription, threshold: 30 },
            Step { id: StepId::Ocr, threshold: 50 },
            Step { id: StepId::Correlation, threshold: 70 },
            Step { id: StepId::Generation, threshold: 90 },
            Step { id: StepId::Export, threshold: 100 },
        ];
        Self::new(steps, 20).expect("standard catalog is valid")
    }

    pub fn new(steps: Vec<Step>, window: u8) -> Result<Self, CatalogError> {
        if steps.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut previous: Option<u8> = None;
        for (index, step) in steps.iter().enumerate() {
            if step.threshold > 100 {
                return Err(CatalogError::ThresholdOutOfRange { index });
            }
            if let Some(prev) = previous {
                if step.threshold <= prev {
                    return Err(CatalogError::NonIncreasing { index });
                }
            }
            previous = Some(step.threshold);
        }
        Ok(Self { steps, window })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn window(&self) -> u8 {
        self.window
    }

    /// Classify every step for the given percentage. Pure: recomputed from
    /// scratch on every call, so rendering the same percentage twice yields
    /// the same marks.
    pub fn classify(&self, percent: u8) -> Vec<StepMark> {
        self.steps
            .iter()
            .map(|step| mark_for(step.threshold, self.window, percent))
            .collect()
    }
}

fn mark_for(threshold: u8, window: u8, percent: u8) -> StepMark {
    if percent >= threshold {
        StepMark::Completed
    } else if percent >= threshold.saturating_sub(window) {
        StepMark::Current
    } else {
        StepMark::Pending
    }
}
