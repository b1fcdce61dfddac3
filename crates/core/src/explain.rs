use rand::Rng;

use crate::model::{Operation, Step, StepSequence, StepVisual, Theme};

//
// ─── EXPLANATION GENERATOR ─────────────────────────────────────────────────────
//

/// Builds the step-by-step walkthrough for one arithmetic problem.
///
/// Every successful walkthrough is exactly five steps: an introduction, two
/// build-up steps, a counting reveal, and a closing summary. All steps share
/// one randomly rolled object theme so the story stays coherent, and the
/// steps alone carry enough data to redraw the whole lesson.
///
/// Requests the tutor cannot explain (a negative difference, division by
/// zero, a sum or product beyond `u32`) come back as a refusal: a single
/// kid-facing error card with no result.
///
/// # Examples
///
/// ```
/// # use tutor_core::explain::explain;
/// # use tutor_core::model::Operation;
/// let walkthrough = explain(Operation::Multiply, 4, 3);
/// assert_eq!(walkthrough.result(), Some(12));
/// assert_eq!(walkthrough.steps().len(), 5);
///
/// let refusal = explain(Operation::Divide, 6, 0);
/// assert_eq!(refusal.result(), None);
/// ```
#[must_use]
pub fn explain(op: Operation, a: u32, b: u32) -> StepSequence {
    explain_with_rng(op, a, b, &mut rand::rng())
}

/// Like [`explain`], with a caller-supplied source of randomness.
///
/// The randomness only picks the cosmetic theme; the arithmetic and the step
/// shapes are fully determined by the inputs.
#[must_use]
pub fn explain_with_rng(op: Operation, a: u32, b: u32, rng: &mut impl Rng) -> StepSequence {
    match op {
        Operation::Add => addition(a, b, rng),
        Operation::Subtract => subtraction(a, b, rng),
        Operation::Multiply => multiplication(a, b, rng),
        Operation::Divide => division(a, b, rng),
    }
}

//
// ─── PER-OPERATION WALKTHROUGHS ────────────────────────────────────────────────
//

fn addition(a: u32, b: u32, rng: &mut impl Rng) -> StepSequence {
    let Some(result) = a.checked_add(b) else {
        return too_big();
    };
    let theme = Theme::pick(rng);
    let icon = Some(theme.icon());
    let steps = vec![
        Step::new(format!("Let's add {a} and {b}."), icon, StepVisual::Intro),
        Step::new(
            format!("First, here are {}.", theme.counted(a)),
            icon,
            StepVisual::Total { total: a },
        ),
        Step::new(
            format!("Now {} more come along!", theme.counted(b)),
            icon,
            StepVisual::Adding {
                initial: a,
                added: b,
            },
        ),
        Step::new(
            format!("Count them all: 1, 2, ... all the way to {result}!"),
            icon,
            StepVisual::Result { value: result },
        ),
        Step::new(
            format!("So, {a} + {b} = {result}. Great job!"),
            icon,
            StepVisual::Summary { total: result },
        ),
    ];
    StepSequence::completed(result, steps)
}

fn subtraction(a: u32, b: u32, rng: &mut impl Rng) -> StepSequence {
    if b > a {
        return StepSequence::refusal(format!(
            "Oops! We can't take {b} away from {a}. Let's try a smaller number!"
        ));
    }
    let result = a - b;
    let theme = Theme::pick(rng);
    let icon = Some(theme.icon());
    let steps = vec![
        Step::new(
            format!("Let's subtract {b} from {a}."),
            icon,
            StepVisual::Intro,
        ),
        Step::new(
            format!("Here are {}.", theme.counted(a)),
            icon,
            StepVisual::Total { total: a },
        ),
        Step::new(
            format!("Now take {} away.", theme.counted(b)),
            icon,
            StepVisual::TakingAway {
                initial: a,
                taken: b,
            },
        ),
        Step::new(
            format!("Count what's left: {result}!"),
            icon,
            StepVisual::Result { value: result },
        ),
        Step::new(
            format!("So, {a} - {b} = {result}. Great job!"),
            icon,
            StepVisual::Summary { total: result },
        ),
    ];
    StepSequence::completed(result, steps)
}

fn multiplication(a: u32, b: u32, rng: &mut impl Rng) -> StepSequence {
    let Some(result) = a.checked_mul(b) else {
        return too_big();
    };
    let theme = Theme::pick(rng);
    let icon = Some(theme.icon());
    let steps = vec![
        Step::new(
            format!("Let's multiply {a} times {b}."),
            icon,
            StepVisual::Intro,
        ),
        Step::new(
            format!("Look! We have {}.", theme.counted_containers(a)),
            icon,
            StepVisual::Groups {
                groups: a,
                items_per_group: 0,
            },
        ),
        Step::new(
            format!(
                "Now, put {} in every {}.",
                theme.counted(b),
                theme.container()
            ),
            icon,
            StepVisual::Groups {
                groups: a,
                items_per_group: b,
            },
        ),
        Step::new(
            format!("Count them with me: 1, 2, ... all the way to {result}!"),
            icon,
            StepVisual::Result { value: result },
        ),
        Step::new(
            format!("So, {a} × {b} = {result}. Great job!"),
            icon,
            StepVisual::Summary { total: result },
        ),
    ];
    StepSequence::completed(result, steps)
}

/// Division is taught as circling: how many full containers can we fill?
/// The walkthrough ends on the reveal rather than a summary sentence, and a
/// leftover is carried on the sequence for the renderer to show.
fn division(a: u32, b: u32, rng: &mut impl Rng) -> StepSequence {
    if b == 0 {
        return StepSequence::refusal("Can't share with zero!");
    }
    let quotient = a / b;
    let remainder = a % b;
    let theme = Theme::pick(rng);
    let icon = Some(theme.icon());
    let steps = vec![
        Step::new(
            format!("Let's divide {a} by {b}."),
            icon,
            StepVisual::Intro,
        ),
        Step::new(
            format!("Here are {}.", theme.counted(a)),
            icon,
            StepVisual::Total { total: a },
        ),
        Step::new(
            format!(
                "We need to put {} in each {}.",
                theme.counted(b),
                theme.container()
            ),
            icon,
            StepVisual::Intro,
        ),
        Step::new(
            format!("Circle groups of {b}..."),
            icon,
            StepVisual::Grouping {
                total: a,
                group_size: b,
            },
        ),
        Step::new(
            format!("See? We filled {}!", theme.counted_containers(quotient)),
            icon,
            StepVisual::Result { value: quotient },
        ),
    ];
    StepSequence::with_remainder(quotient, remainder, steps)
}

fn too_big() -> StepSequence {
    StepSequence::refusal("Whoa! Those numbers are too big for me. Let's try smaller ones!")
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_builds_five_steps_with_the_sum() {
        let sequence = explain(Operation::Add, 4, 3);
        assert_eq!(sequence.result(), Some(7));
        assert_eq!(sequence.remainder(), None);
        assert_eq!(sequence.steps().len(), 5);
        assert_eq!(sequence.steps()[0].visual(), StepVisual::Intro);
        assert_eq!(
            sequence.steps()[2].visual(),
            StepVisual::Adding {
                initial: 4,
                added: 3
            }
        );
        assert_eq!(
            sequence.steps()[4].visual(),
            StepVisual::Summary { total: 7 }
        );
        assert!(sequence.steps()[4].text().contains("4 + 3 = 7"));
    }

    #[test]
    fn subtraction_takes_from_the_pile() {
        let sequence = explain(Operation::Subtract, 9, 4);
        assert_eq!(sequence.result(), Some(5));
        assert_eq!(
            sequence.steps()[2].visual(),
            StepVisual::TakingAway {
                initial: 9,
                taken: 4
            }
        );
        assert!(sequence.steps()[4].text().contains("9 - 4 = 5"));
    }

    #[test]
    fn subtracting_everything_is_allowed() {
        let sequence = explain(Operation::Subtract, 5, 5);
        assert_eq!(sequence.result(), Some(0));
        assert!(!sequence.is_refusal());
    }

    #[test]
    fn negative_difference_is_refused() {
        let sequence = explain(Operation::Subtract, 3, 7);
        assert!(sequence.is_refusal());
        assert_eq!(sequence.steps().len(), 1);
        assert!(sequence.steps()[0].is_error());
        assert!(sequence.steps()[0].text().contains("can't take 7 away from 3"));
    }

    #[test]
    fn multiplication_fills_groups() {
        let sequence = explain(Operation::Multiply, 4, 3);
        assert_eq!(sequence.result(), Some(12));
        assert_eq!(
            sequence.steps()[1].visual(),
            StepVisual::Groups {
                groups: 4,
                items_per_group: 0
            }
        );
        assert_eq!(
            sequence.steps()[2].visual(),
            StepVisual::Groups {
                groups: 4,
                items_per_group: 3
            }
        );
        assert!(sequence.steps()[4].text().contains("4 × 3 = 12"));
    }

    #[test]
    fn division_reports_quotient_and_remainder() {
        let sequence = explain(Operation::Divide, 7, 2);
        assert_eq!(sequence.result(), Some(3));
        assert_eq!(sequence.remainder(), Some(1));
        assert_eq!(
            sequence.steps()[3].visual(),
            StepVisual::Grouping {
                total: 7,
                group_size: 2
            }
        );
        // Division ends on the reveal, not a summary card.
        assert_eq!(sequence.steps()[4].visual(), StepVisual::Result { value: 3 });
    }

    #[test]
    fn exact_division_has_zero_remainder() {
        let sequence = explain(Operation::Divide, 12, 3);
        assert_eq!(sequence.result(), Some(4));
        assert_eq!(sequence.remainder(), Some(0));
    }

    #[test]
    fn division_by_zero_is_refused() {
        let sequence = explain(Operation::Divide, 6, 0);
        assert!(sequence.is_refusal());
        assert_eq!(sequence.steps()[0].text(), "Can't share with zero!");
    }

    #[test]
    fn overflowing_sum_is_refused() {
        let sequence = explain(Operation::Add, u32::MAX, 1);
        assert!(sequence.is_refusal());
    }

    #[test]
    fn overflowing_product_is_refused() {
        let sequence = explain(Operation::Multiply, u32::MAX, 2);
        assert!(sequence.is_refusal());
    }

    #[test]
    fn theme_is_constant_within_a_walkthrough() {
        let mut rng = rand::rng();
        for op in Operation::ALL {
            let sequence = explain_with_rng(op, 6, 2, &mut rng);
            let first = sequence.steps()[0].icon();
            assert!(first.is_some());
            assert!(sequence.steps().iter().all(|step| step.icon() == first));
        }
    }

    #[test]
    fn singular_counts_read_naturally() {
        use crate::model::THEMES;

        let mut rng = rand::rng();
        for _ in 0..20 {
            let sequence = explain_with_rng(Operation::Add, 1, 1, &mut rng);
            for theme in THEMES {
                let plural_one = format!("1 {}", theme.plural());
                assert!(
                    sequence.steps().iter().all(|s| !s.text().contains(&plural_one)),
                    "found {plural_one:?} in a walkthrough"
                );
            }
        }
    }
}
