//! Built-in question catalog for the Data Science learning site.

use crate::bank::QuestionBank;
use crate::error::Error;
use crate::model::{Category, CategoryId, Difficulty, Question, QuestionId};

struct Seed {
    id: &'static str,
    prompt: &'static str,
    options: &'static [&'static str],
    correct: usize,
    explanation: &'static str,
    difficulty: Difficulty,
    topic: &'static str,
    points: u32,
}

impl Seed {
    fn build(&self) -> Result<Question, Error> {
        Ok(Question::new(
            QuestionId::new(self.id),
            self.prompt,
            self.options.iter().map(|o| (*o).to_owned()).collect(),
            self.correct,
            self.explanation,
            self.difficulty,
            self.topic,
            self.points,
        )?)
    }
}

const STATISTICS: &[Seed] = &[
    Seed {
        id: "stats-mean",
        prompt: "What is the mean of 2, 4, 6 and 8?",
        options: &["4", "5", "6", "20"],
        correct: 1,
        explanation: "The mean is the sum (20) divided by the count (4).",
        difficulty: Difficulty::Beginner,
        topic: "Descriptive Statistics",
        points: 10,
    },
    Seed {
        id: "stats-median-outlier",
        prompt: "Which measure of central tendency is least affected by outliers?",
        options: &["Mean", "Median", "Range", "Variance"],
        correct: 1,
        explanation: "The median only depends on the middle value(s), so extreme values barely move it.",
        difficulty: Difficulty::Beginner,
        topic: "Descriptive Statistics",
        points: 10,
    },
    Seed {
        id: "stats-std-dev",
        prompt: "Standard deviation is the square root of which quantity?",
        options: &["Mean", "Variance", "Interquartile range", "Covariance"],
        correct: 1,
        explanation: "Variance is the mean squared deviation; its square root restores the original units.",
        difficulty: Difficulty::Beginner,
        topic: "Descriptive Statistics",
        points: 10,
    },
    Seed {
        id: "stats-p-value",
        prompt: "A p-value of 0.03 with a significance level of 0.05 means you should:",
        options: &[
            "Fail to reject the null hypothesis",
            "Reject the null hypothesis",
            "Accept the alternative hypothesis as proven",
            "Increase the sample size",
        ],
        correct: 1,
        explanation: "The p-value is below the significance level, so the null hypothesis is rejected.",
        difficulty: Difficulty::Intermediate,
        topic: "Hypothesis Testing",
        points: 15,
    },
    Seed {
        id: "stats-normal-68",
        prompt: "In a normal distribution, roughly what share of values lie within one standard deviation of the mean?",
        options: &["50%", "68%", "95%", "99.7%"],
        correct: 1,
        explanation: "The 68-95-99.7 rule: about 68% of values fall within one standard deviation.",
        difficulty: Difficulty::Beginner,
        topic: "Probability Distributions",
        points: 10,
    },
    Seed {
        id: "stats-clt",
        prompt: "The Central Limit Theorem states that the distribution of sample means approaches:",
        options: &[
            "A uniform distribution",
            "The population distribution",
            "A normal distribution",
            "A Poisson distribution",
        ],
        correct: 2,
        explanation: "With large enough samples, sample means are approximately normal regardless of the population shape.",
        difficulty: Difficulty::Intermediate,
        topic: "Probability Distributions",
        points: 15,
    },
];

const PROGRAMMING: &[Seed] = &[
    Seed {
        id: "py-list-comprehension",
        prompt: "What does [x * 2 for x in range(3)] evaluate to in Python?",
        options: &["[0, 2, 4]", "[2, 4, 6]", "[0, 1, 2]", "[1, 2, 3]"],
        correct: 0,
        explanation: "range(3) yields 0, 1, 2 and each value is doubled.",
        difficulty: Difficulty::Beginner,
        topic: "Python Basics",
        points: 10,
    },
    Seed {
        id: "py-pandas-groupby",
        prompt: "Which pandas method splits a DataFrame into groups for aggregation?",
        options: &["pivot", "merge", "groupby", "melt"],
        correct: 2,
        explanation: "groupby implements split-apply-combine.",
        difficulty: Difficulty::Intermediate,
        topic: "Pandas",
        points: 15,
    },
    Seed {
        id: "py-numpy-broadcast",
        prompt: "Adding an array of shape (3, 1) to an array of shape (1, 4) in NumPy produces shape:",
        options: &["(3, 4)", "(1, 1)", "(4, 3)", "An error"],
        correct: 0,
        explanation: "Broadcasting stretches both size-1 dimensions to (3, 4).",
        difficulty: Difficulty::Advanced,
        topic: "NumPy",
        points: 20,
    },
    Seed {
        id: "py-missing-values",
        prompt: "Which pandas call drops rows that contain missing values?",
        options: &["df.fillna()", "df.dropna()", "df.isna()", "df.drop_duplicates()"],
        correct: 1,
        explanation: "dropna removes rows (or columns) with missing values.",
        difficulty: Difficulty::Beginner,
        topic: "Pandas",
        points: 10,
    },
];

const MACHINE_LEARNING: &[Seed] = &[
    Seed {
        id: "ml-overfitting",
        prompt: "A model scores 99% on training data and 60% on test data. This is most likely:",
        options: &["Underfitting", "Overfitting", "Data leakage", "A well-tuned model"],
        correct: 1,
        explanation: "A large gap between training and test performance signals overfitting.",
        difficulty: Difficulty::Intermediate,
        topic: "Model Evaluation",
        points: 15,
    },
    Seed {
        id: "ml-supervised",
        prompt: "Which of these is a supervised learning task?",
        options: &[
            "Clustering customers",
            "Predicting house prices from labeled sales",
            "Reducing dimensions with PCA",
            "Finding association rules",
        ],
        correct: 1,
        explanation: "Supervised learning fits a mapping from features to known labels.",
        difficulty: Difficulty::Beginner,
        topic: "Learning Paradigms",
        points: 10,
    },
    Seed {
        id: "ml-precision",
        prompt: "Precision is defined as:",
        options: &["TP / (TP + FN)", "TP / (TP + FP)", "TN / (TN + FP)", "(TP + TN) / total"],
        correct: 1,
        explanation: "Precision is the share of predicted positives that are truly positive.",
        difficulty: Difficulty::Intermediate,
        topic: "Model Evaluation",
        points: 15,
    },
    Seed {
        id: "ml-regularization",
        prompt: "L1 regularization tends to:",
        options: &[
            "Increase all weights",
            "Drive some weights exactly to zero",
            "Remove the bias term",
            "Double the learning rate",
        ],
        correct: 1,
        explanation: "The L1 penalty produces sparse solutions.",
        difficulty: Difficulty::Advanced,
        topic: "Regularization",
        points: 20,
    },
];

fn category(
    id: &str,
    title: &str,
    description: &str,
    difficulty: Difficulty,
    estimated_minutes: u32,
    seeds: &[Seed],
) -> Result<Category, Error> {
    let questions = seeds.iter().map(Seed::build).collect::<Result<Vec<_>, _>>()?;
    Ok(Category::new(
        CategoryId::new(id),
        title,
        description,
        difficulty,
        estimated_minutes,
        Vec::new(),
        questions,
    )?)
}

/// The catalog shipped with the site.
///
/// # Errors
///
/// Returns `Error` if any built-in record fails validation.
pub fn builtin_bank() -> Result<QuestionBank, Error> {
    Ok(QuestionBank::new(vec![
        category(
            "statistics",
            "Statistics",
            "Descriptive statistics, distributions and hypothesis testing.",
            Difficulty::Beginner,
            10,
            STATISTICS,
        )?,
        category(
            "programming",
            "Programming",
            "Python, pandas and NumPy for data work.",
            Difficulty::Intermediate,
            8,
            PROGRAMMING,
        )?,
        category(
            "machine-learning",
            "Machine Learning",
            "Learning paradigms, evaluation metrics and regularization.",
            Difficulty::Intermediate,
            8,
            MACHINE_LEARNING,
        )?,
        category(
            "data-visualization",
            "Data Visualization",
            "Chart selection and visual encoding. Questions are being written.",
            Difficulty::Beginner,
            5,
            &[],
        )?,
    ])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_bank_is_valid() {
        let bank = builtin_bank().unwrap();
        assert_eq!(bank.len(), 4);
        assert_eq!(bank.question_count(), 14);
        let stats = bank.category(&CategoryId::new("statistics")).unwrap();
        assert!(stats.topics().contains("Hypothesis Testing"));
        assert!(
            bank.category(&CategoryId::new("data-visualization"))
                .unwrap()
                .is_empty()
        );
    }
}
