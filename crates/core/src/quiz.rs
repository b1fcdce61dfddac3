use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::model::{Operation, QuizQuestion};

//
// ─── WORD-PROBLEM TABLES ───────────────────────────────────────────────────────
//

/// Protagonist names. The friend in a two-child story is always drawn to be
/// a different name.
pub const NAMES: [&str; 30] = [
    "Sally", "Tom", "Ben", "Mia", "Lucas", "Emma", "Noah", "Ava", "Leo", "Zoe", "Max", "Lily",
    "Sam", "Ella", "Jack", "Ruby", "Oliver", "Chloe", "Ethan", "Sophie", "Liam", "Maya", "Aiden",
    "Grace", "Caleb", "Harper", "Mason", "Evelyn", "Logan", "Avery",
];

/// Places a story can happen.
pub const PLACES: [&str; 9] = [
    "store",
    "park",
    "school",
    "garden",
    "library",
    "beach",
    "zoo",
    "playground",
    "fair",
];

struct QuizObject {
    name: &'static str,
    plural: &'static str,
    icon: &'static str,
}

const OBJECTS: [QuizObject; 26] = [
    QuizObject { name: "apple", plural: "apples", icon: "🍎" },
    QuizObject { name: "balloon", plural: "balloons", icon: "🎈" },
    QuizObject { name: "car", plural: "cars", icon: "🚗" },
    QuizObject { name: "star", plural: "stars", icon: "⭐" },
    QuizObject { name: "cookie", plural: "cookies", icon: "🍪" },
    QuizObject { name: "duck", plural: "ducks", icon: "🦆" },
    QuizObject { name: "pencil", plural: "pencils", icon: "✏️" },
    QuizObject { name: "book", plural: "books", icon: "📚" },
    QuizObject { name: "flower", plural: "flowers", icon: "🌸" },
    QuizObject { name: "cupcake", plural: "cupcakes", icon: "🧁" },
    QuizObject { name: "cat", plural: "cats", icon: "🐱" },
    QuizObject { name: "dog", plural: "dogs", icon: "🐶" },
    QuizObject { name: "ball", plural: "balls", icon: "⚽" },
    QuizObject { name: "pizza", plural: "pizzas", icon: "🍕" },
    QuizObject { name: "robot", plural: "robots", icon: "🤖" },
    QuizObject { name: "banana", plural: "bananas", icon: "🍌" },
    QuizObject { name: "hat", plural: "hats", icon: "🧢" },
    QuizObject { name: "candy", plural: "candies", icon: "🍬" },
    QuizObject { name: "bird", plural: "birds", icon: "🐦" },
    QuizObject { name: "fish", plural: "fish", icon: "🐠" },
    QuizObject { name: "kite", plural: "kites", icon: "🪁" },
    QuizObject { name: "tree", plural: "trees", icon: "🌳" },
    QuizObject { name: "butterfly", plural: "butterflies", icon: "🦋" },
    QuizObject { name: "chair", plural: "chairs", icon: "🪑" },
    QuizObject { name: "orange", plural: "oranges", icon: "🍊" },
    QuizObject { name: "bunny", plural: "bunnies", icon: "🐰" },
];

//
// ─── QUESTION GENERATION ───────────────────────────────────────────────────────
//

/// Generates one situational word problem for the daily challenge.
///
/// The category is a uniform draw over the four operations; names, objects,
/// and places come from the fixed tables above. Operands are bounded so that
/// every answer is a small positive whole number: subtraction never goes
/// negative and division is always exact.
#[must_use]
pub fn situational_question(rng: &mut impl Rng) -> QuizQuestion {
    let op = *Operation::ALL.choose(rng).unwrap_or(&Operation::Add);
    let name = pick_name(rng);
    let friend = pick_friend(rng, name);
    let object = OBJECTS.choose(rng).unwrap_or(&OBJECTS[0]);
    let place = *PLACES.choose(rng).unwrap_or(&PLACES[0]);

    let (a, b, answer) = operands(op, rng);
    let text = match op {
        Operation::Add => addition_text(rng, name, friend, object, place, a, b),
        Operation::Subtract => subtraction_text(rng, name, friend, object, a, b),
        Operation::Multiply => multiplication_text(rng, name, object, a, b),
        Operation::Divide => division_text(rng, name, object, a, b),
    };

    let options = answer_options(answer, rng);
    QuizQuestion::new(text, options, answer, object.icon)
        .expect("generated options satisfy the question invariants")
}

/// The quiz-mode gate: asks for the answer to the problem the child just
/// typed, before any explanation is shown.
#[must_use]
pub fn gate_question(
    op: Operation,
    a: u32,
    b: u32,
    result: u32,
    icon: &'static str,
    rng: &mut impl Rng,
) -> QuizQuestion {
    let text = format!("What do you think? What is {a} {} {b}?", op.symbol());
    let options = answer_options(result, rng);
    QuizQuestion::new(text, options, result, icon)
        .expect("generated options satisfy the question invariants")
}

/// Builds the three shuffled answer choices for `correct`.
///
/// The two distractors land within ±2 of the answer; zero, duplicates, and
/// the answer itself are re-rolled, so the result is always three distinct
/// positive values containing `correct`.
#[must_use]
pub fn answer_options(correct: u32, rng: &mut impl Rng) -> [u32; 3] {
    let mut options = [correct; 3];
    let mut filled = 1;
    while filled < options.len() {
        let offset: i32 = rng.random_range(-2..=2);
        let Some(candidate) = correct.checked_add_signed(offset) else {
            continue;
        };
        if candidate > 0 && !options[..filled].contains(&candidate) {
            options[filled] = candidate;
            filled += 1;
        }
    }
    options.shuffle(rng);
    options
}

/// Operand bounds per category. Kept small enough for mental arithmetic by
/// a five-to-eight year old.
fn operands(op: Operation, rng: &mut impl Rng) -> (u32, u32, u32) {
    match op {
        Operation::Add => {
            let a = rng.random_range(2..=10);
            let b = rng.random_range(1..=9);
            (a, b, a + b)
        }
        Operation::Subtract => {
            // Build the minuend from the subtrahend so the difference is
            // always positive.
            let b = rng.random_range(1..=6);
            let a = b + rng.random_range(1..=6);
            (a, b, a - b)
        }
        Operation::Multiply => {
            let a = rng.random_range(2..=6);
            let b = rng.random_range(2..=6);
            (a, b, a * b)
        }
        Operation::Divide => {
            // Build the dividend from divisor × answer so division is exact.
            let b = rng.random_range(2..=5);
            let answer = rng.random_range(2..=5);
            (b * answer, b, answer)
        }
    }
}

fn pick_name(rng: &mut impl Rng) -> &'static str {
    NAMES.choose(rng).copied().unwrap_or("Sam")
}

fn pick_friend(rng: &mut impl Rng, name: &'static str) -> &'static str {
    loop {
        let friend = pick_name(rng);
        if friend != name {
            return friend;
        }
    }
}

//
// ─── STORY TEMPLATES ───────────────────────────────────────────────────────────
//

fn addition_text(
    rng: &mut impl Rng,
    name: &str,
    friend: &str,
    object: &QuizObject,
    place: &str,
    a: u32,
    b: u32,
) -> String {
    let objs = object.plural;
    match rng.random_range(0..13) {
        0 => format!("{name} has {a} {objs}. They find {b} more. How many now?"),
        1 => format!(
            "{name} buys {a} {objs} and grandma gives them {b} more. How many in total?"
        ),
        2 => format!(
            "There are {a} {objs} on the table. {name} puts {b} more there. Count them all!"
        ),
        3 => format!("{name} saw {a} {objs} yesterday and {b} today. How many did they see?"),
        4 => format!(
            "{name} has {a} {objs} and {friend} gives them {b} more. How many does {name} have now?"
        ),
        5 => format!("At the {place}, {name} found {a} {objs}. Then they found {b} more! Total?"),
        6 => format!("If you have {a} {objs} and you buy {b} more, how many do you have?"),
        7 => format!(
            "{name} collected {a} {objs}. {friend} collected {b} {objs}. How many together?"
        ),
        8 => format!("There are {a} red {objs} and {b} blue {objs}. How many {objs} in all?"),
        9 => format!("First count {a} {objs}. Then count {b} more. What is the sum?"),
        10 => format!(
            "{name} brings {a} {objs} to the party. {friend} brings {b}. How many {objs} are at the party?"
        ),
        11 => format!("The team scored {a} points, then {b} more points. What is the total score?"),
        _ => format!(
            "In the morning, {name} ate {a} {objs}. In the evening, they ate {b} more. How many eaten?"
        ),
    }
}

fn subtraction_text(
    rng: &mut impl Rng,
    name: &str,
    friend: &str,
    object: &QuizObject,
    a: u32,
    b: u32,
) -> String {
    let objs = object.plural;
    match rng.random_range(0..12) {
        0 => format!("{name} had {a} {objs}. They ate {b}. How many are left?"),
        1 => format!("{name} has {a} {objs}. They gave {b} to {friend}. How many now?"),
        2 => format!("There were {a} {objs}. {b} flew away. How many remain?"),
        3 => format!("{name} collected {a} {objs} but lost {b}. How many are left?"),
        4 => format!("The store had {a} {objs}. {name} bought {b}. How many are left at the store?"),
        5 => format!("There are {a} {objs} in a box. {name} takes out {b}. How many are inside now?"),
        6 => format!("{name} needs {a} {objs}. They already have {b}. How many more do they need?"),
        7 => format!("If there are {a} birds and {b} fly away, how many birds stay?"),
        8 => format!("{name} made {a} {objs} but dropped {b}. How many are safe?"),
        9 => format!("{a} {objs} were on the wall. {b} fell off. How many remain?"),
        10 => format!("{name} has {a} dollars. They spend {b} dollars on {objs}. How much money is left?"),
        _ => format!(
            "{friend} has {a} {objs}. {name} takes {b} to play with. How many does {friend} have left?"
        ),
    }
}

fn multiplication_text(
    rng: &mut impl Rng,
    name: &str,
    object: &QuizObject,
    a: u32,
    b: u32,
) -> String {
    let objs = object.plural;
    match rng.random_range(0..10) {
        0 => format!("{name} has {a} boxes. Each box has {b} {objs}. How many total?"),
        1 => format!("There are {a} rows of {objs}. Each row has {b}. How many in total?"),
        2 => format!(
            "{name} buys {a} bags of {objs}. There are {b} inside each bag. How many total?"
        ),
        3 => format!("If {name} counts by {b}s and does it {a} times, what number do they get?"),
        4 => format!("There are {a} nests. Each nest has {b} baby birds. How many birds?"),
        5 => format!("{name} works for {a} hours. They earn {b} {objs} per hour. How many earned?"),
        6 => format!("{a} friends each have {b} {objs}. How many {objs} altogether?"),
        7 => format!("A wagon has {b} wheels. How many wheels do {a} wagons have?"),
        8 => format!("{name} reads {b} pages every day for {a} days. How many pages read?"),
        _ => format!("Each pack costs {b} dollars. {name} buys {a} packs. How much money?"),
    }
}

fn division_text(
    rng: &mut impl Rng,
    name: &str,
    object: &QuizObject,
    a: u32,
    b: u32,
) -> String {
    let objs = object.plural;
    match rng.random_range(0..10) {
        0 => format!(
            "{name} has {a} {objs}. They share them equally with {b} friends. How many does each get?"
        ),
        1 => format!("There are {a} {objs}. {name} puts them into groups of {b}. How many groups?"),
        2 => format!("{name} has {a} {objs} to put into {b} boxes. How many per box?"),
        3 => format!("If you share {a} {objs} between {b} people, how many each?"),
        4 => format!("{a} {objs} need to fit into {b} cars. How many in each car?"),
        5 => format!(
            "{name} has {a} dollars. Each {} costs {b} dollars. How many can they buy?",
            object.name
        ),
        6 => format!("Divide {a} {objs} into {b} equal piles. How many in a pile?"),
        7 => format!("{name} walks {a} miles in {b} days. How many miles per day?"),
        8 => format!("There are {a} students and {b} teams. How many students on a team?"),
        _ => format!("{name} eats {b} {objs} a day. How many days to eat {a} {objs}?"),
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
