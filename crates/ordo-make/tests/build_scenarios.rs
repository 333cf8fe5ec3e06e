#![allow(clippy::unwrap_used)]

//! End-to-end builds from makefile and ages text.

use ordo_make::{
    Ages, Diagnostic, MakeConfig, MakeError, Maker, ParseErrorKind, parse_ages, parse_makefile,
};
use proptest::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn maker(makefile: &str, ages: &str) -> Maker {
    init_tracing();
    let makefile = parse_makefile(makefile);
    assert!(makefile.errors.is_empty(), "{:?}", makefile.errors);
    let mut maker = Maker::new(parse_ages(ages));
    maker.load(&makefile).unwrap();
    maker
}

fn build(maker: &mut Maker, goal: &str) -> Vec<String> {
    let mut out: Vec<u8> = Vec::new();
    maker.build(goal, &mut out).unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

const CHAIN: &str = "\
A: B
\techo build A
B: C
\techo build B
C:
\techo build C
";

#[test]
fn chain_with_one_existing_target() {
    let mut m = maker(CHAIN, "10\nC 5\n");
    assert_eq!(
        build(&mut m, "A"),
        ["\techo build C", "\techo build B", "\techo build A"]
    );
    for target in ["A", "B", "C"] {
        assert_eq!(m.rule(target).unwrap().time(), Some(10));
    }
}

#[test]
fn building_twice_emits_nothing_the_second_time() {
    let mut m = maker(CHAIN, "10\nC 5\n");
    assert_eq!(build(&mut m, "A").len(), 3);
    assert!(build(&mut m, "A").is_empty());
    assert!(build(&mut m, "B").is_empty());
}

#[test]
fn fresh_targets_are_skipped() {
    let mut m = maker(CHAIN, "10\nA 10\nB 12\nC 3\n");
    assert_eq!(build(&mut m, "A"), ["\techo build C"]);
    assert_eq!(m.rule("B").unwrap().time(), Some(12));
}

#[test]
fn rules_merge_across_headers() {
    let text = "\
app: main.o
app: util.o
\tcc -o app main.o util.o
main.o:
\tcc -c main.c
util.o:
\tcc -c util.c
";
    let mut m = maker(text, "1");
    assert_eq!(
        build(&mut m, "app"),
        ["\tcc -c main.c", "\tcc -c util.c", "\tcc -o app main.o util.o"]
    );
}

#[test]
fn duplicate_command_sets_stop_loading() {
    let makefile = parse_makefile("a:\n\tone\nb:\n\ttwo\na: b\n\tthree\n");
    let mut m = Maker::new(Ages::new(0));
    let err = m.load(&makefile).unwrap_err();
    assert!(matches!(err, MakeError::DuplicateCommands { ref target } if target == "a"));
}

#[test]
fn unknown_goal_without_commands_warns() {
    let mut m = maker(CHAIN, "10");
    let mut out: Vec<u8> = Vec::new();
    let report = m.build("install", &mut out).unwrap();
    assert!(out.is_empty());
    assert_eq!(
        report.diagnostics,
        [Diagnostic::MissingCommands {
            target: "install".to_string()
        }]
    );
}

#[test]
fn parse_errors_do_not_stop_the_build() {
    init_tracing();
    let text = "\
stray line
all: a=b lib
\techo all
lib:
\techo lib
";
    let makefile = parse_makefile(text);
    assert_eq!(makefile.errors.len(), 2);
    assert!(matches!(makefile.errors[0].kind, ParseErrorKind::ErroneousLine(_)));
    assert_eq!(makefile.errors[1].line, 2);
    assert!(matches!(makefile.errors[1].kind, ParseErrorKind::BadPrerequisites(_)));

    let mut out: Vec<u8> = Vec::new();
    let report = ordo_make::run(text, "5", &["all", "lib"], MakeConfig::default(), &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "\techo lib\n");
    assert_eq!(report.rebuilt, ["all", "lib"]);
}

#[test]
fn reset_starts_a_new_invocation() {
    let mut m = maker(CHAIN, "10");
    assert_eq!(build(&mut m, "B").len(), 2);
    m.reset();
    assert!(!m.rule("B").unwrap().is_finished());
    assert!(build(&mut m, "B").is_empty());
    // A never existed, so it is still stale.
    assert_eq!(build(&mut m, "A"), ["\techo build A"]);
}

// ---------------------------------------------------------------------------
// Random dependency DAGs
// ---------------------------------------------------------------------------

/// Targets `t0..tn`, each depending only on higher-numbered targets, with a
/// random subset already up to date.
fn dag() -> impl Strategy<Value = (usize, Vec<(usize, usize)>, Vec<bool>)> {
    (1..12usize).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n), 0..30),
            prop::collection::vec(any::<bool>(), n),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn dependencies_are_emitted_before_dependents((n, deps, fresh) in dag()) {
        let mut ages = Ages::new(100);
        for (i, &is_fresh) in fresh.iter().enumerate() {
            if is_fresh {
                ages.insert(format!("t{i}"), 100);
            }
        }
        let mut m = Maker::new(ages);

        for i in 0..n {
            let mine: Vec<String> = deps
                .iter()
                .filter(|&&(a, b)| a == i && b > a)
                .map(|&(_, b)| format!("t{b}"))
                .collect();
            m.add_rule(&format!("t{i}"), &mine, [format!("make t{i}")]).unwrap();
        }

        let mut out: Vec<u8> = Vec::new();
        let report = m.build("t0", &mut out).unwrap();
        prop_assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);

        let emitted: Vec<String> = String::from_utf8(out).unwrap().lines().map(str::to_string).collect();
        prop_assert_eq!(&emitted, &report.commands);

        let position = |t: &str| emitted.iter().position(|c| c == &format!("make {t}"));
        for &(a, b) in &deps {
            if b <= a {
                continue;
            }
            if let (Some(pa), Some(pb)) = (position(&format!("t{a}")), position(&format!("t{b}"))) {
                prop_assert!(pb < pa, "t{} emitted after t{}", b, a);
            }
        }

        // Stale targets are emitted at most once, fresh ones never.
        for (i, &is_fresh) in fresh.iter().enumerate() {
            let count = emitted.iter().filter(|c| **c == format!("make t{i}")).count();
            prop_assert!(count <= 1);
            if is_fresh {
                prop_assert_eq!(count, 0);
            }
        }
        let mut again: Vec<u8> = Vec::new();
        prop_assert!(m.build("t0", &mut again).unwrap().is_up_to_date());
        prop_assert!(again.is_empty());
    }
}
