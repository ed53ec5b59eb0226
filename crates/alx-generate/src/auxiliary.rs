//! C project auxiliaries: Makefile, header file and the `_putchar` helper

use alx_schema::{ProjectSchema, TaskSchema};
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static OUTPUT_FLAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"-o\s+(\S+)").expect("valid regex"));

/// Name of the build file
pub const MAKEFILE: &str = "Makefile";

/// Name of the helper source referenced by compilation commands
pub const PUTCHAR_SOURCE: &str = "_putchar.c";

const MAKEFILE_BANNER: &str = "# Makefile for Your Project";
const GROUP_ALL_RECIPE: &str = "\tgcc -Wall -Werror -Wextra -pedantic -std=gnu89 *.c";
const TESTS_DIR: &str = "tests";

/// Include guard for a header file name (`0-shapes.h` -> `0_SHAPES_H`)
#[must_use]
pub fn include_guard(header: &str) -> String {
    header
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Point test-file tokens of a command into `tests/`
///
/// Only whole space-separated tokens equal to one of the task's test file
/// names are rewritten.
#[must_use]
pub fn rewrite_test_paths(command: &str, task: &TaskSchema) -> String {
    let names: Vec<&str> = task.test_file_names().collect();
    command
        .split(' ')
        .map(|token| {
            if names.contains(&token) {
                format!("{TESTS_DIR}/{token}")
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Makefile lines, or `None` when no rule would be produced
#[must_use]
pub fn makefile(project: &ProjectSchema) -> Option<Vec<String>> {
    let mut lines = vec![MAKEFILE_BANNER.to_string(), String::new()];
    let mut outputs: IndexSet<String> = IndexSet::new();
    let mut rules = 0usize;

    for task in &project.tasks {
        let Some(command) = task.compilation_command() else {
            continue;
        };
        let command = rewrite_test_paths(command, task);
        outputs.extend(OUTPUT_FLAG.captures_iter(&command).map(|c| c[1].to_string()));

        for file in task.c_files() {
            let Some(stem) = Path::new(file).file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            lines.push(format!("{stem}:"));
            lines.push(format!("\t{command}\n"));
            rules += 1;
        }
    }

    let all_rule = project.is_group_project();
    if all_rule {
        lines.extend(["all:".to_string(), GROUP_ALL_RECIPE.to_string(), String::new()]);
    }

    if rules == 0 && !all_rule {
        tracing::debug!("no compilation commands, skipping Makefile");
        return None;
    }

    if !outputs.is_empty() {
        let targets: Vec<&str> = outputs.iter().map(String::as_str).collect();
        lines.extend([
            "clean:".to_string(),
            format!("\t@rm -rf {}", targets.join(" ")),
            "\t@printf \"\\e[34mAll clear!\\e[0m\\n\"".to_string(),
            String::new(),
        ]);
    }

    Some(lines)
}

/// True when any compilation command lists `_putchar.c`
#[must_use]
pub fn needs_putchar(project: &ProjectSchema) -> bool {
    project.tasks.iter().any(|task| {
        task.compilation_command()
            .is_some_and(|cmd| cmd.split_whitespace().any(|t| t == PUTCHAR_SOURCE))
    })
}

/// Header file lines, or `None` when no header is declared
///
/// `directory` names the directory the header serves, for the file comment.
#[must_use]
pub fn header_file(project: &ProjectSchema, directory: &str) -> Option<Vec<String>> {
    let header = project.header()?;
    let guard = include_guard(header);

    let mut lines = vec![
        format!("#ifndef {guard}"),
        format!("#define {guard}"),
        String::new(),
        "/*".to_string(),
        format!(" * File: {header}"),
        " * Desc: Header file containing declarations for all functions".to_string(),
        format!(" *       used in the {directory} directory"),
        " */".to_string(),
        String::new(),
    ];

    if needs_putchar(project) {
        lines.push("int _putchar(char c);".to_string());
    }
    lines.extend(project.prototypes().map(ToString::to_string));
    lines.extend([String::new(), format!("#endif /* {guard} */"), String::new()]);

    Some(lines)
}

/// The `_putchar` helper implementation
#[must_use]
pub fn putchar_source() -> Vec<String> {
    [
        "#include <unistd.h>",
        "",
        "/**",
        " * _putchar - writes the character c to stdout",
        " * @c: The character to print",
        " *",
        " * Return: On success 1.",
        " * On error, -1 is returned, and errno is set appropriately",
        " */",
        "",
        "int _putchar(char c)",
        "{",
        "\treturn (write(1, &c, 1));",
        "}",
        "",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alx_schema::{TestFileSpec, C_TAG, GROUP_PROJECT_TAG};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn c_task(file: &str, command: Option<&str>) -> TaskSchema {
        TaskSchema {
            files: vec![file.to_string()],
            compilation_command: command.map(ToString::to_string),
            ..TaskSchema::new(file)
        }
    }

    fn project(tags: &[&str], tasks: Vec<TaskSchema>) -> ProjectSchema {
        ProjectSchema {
            tags: tags.iter().map(ToString::to_string).collect(),
            tasks,
            ..ProjectSchema::default()
        }
    }

    #[test]
    fn guard_from_file_name() {
        assert_eq!(include_guard("main.h"), "MAIN_H");
        assert_eq!(include_guard("0-shapes.h"), "0_SHAPES_H");
    }

    #[test]
    fn rewrites_exact_test_tokens_only() {
        let task = TaskSchema {
            test_files: vec![TestFileSpec::new("0-main.c", vec!["x".to_string()])],
            ..TaskSchema::new("t")
        };
        assert_eq!(
            rewrite_test_paths("gcc 0-main.c 10-main.c 0-main.cpp -o a", &task),
            "gcc tests/0-main.c 10-main.c 0-main.cpp -o a"
        );
    }

    #[test]
    fn makefile_rules_and_clean_target() {
        let mut task = c_task("1-alphabet.c", Some("gcc 1-main.c 1-alphabet.c -o 1-alphabet"));
        task.test_files = vec![TestFileSpec::new("1-main.c", vec!["int x;".to_string()])];
        let project = project(&[C_TAG], vec![task, c_task("2-islower.c", None)]);

        assert_eq!(
            makefile(&project).unwrap(),
            vec![
                "# Makefile for Your Project",
                "",
                "1-alphabet:",
                "\tgcc tests/1-main.c 1-alphabet.c -o 1-alphabet\n",
                "clean:",
                "\t@rm -rf 1-alphabet",
                "\t@printf \"\\e[34mAll clear!\\e[0m\\n\"",
                "",
            ]
        );
    }

    #[test]
    fn clean_outputs_are_deduplicated_in_order() {
        let project = project(
            &[C_TAG],
            vec![
                c_task("b.c", Some("gcc b.c -o out && gcc b.c -o b")),
                c_task("a.c", Some("gcc a.c -o out")),
            ],
        );
        let lines = makefile(&project).unwrap();
        assert!(lines.contains(&"\t@rm -rf out b".to_string()));
    }

    #[test]
    fn group_projects_get_all_rule() {
        let lines = makefile(&project(&[C_TAG, GROUP_PROJECT_TAG], vec![])).unwrap();
        assert_eq!(
            lines,
            vec![
                "# Makefile for Your Project",
                "",
                "all:",
                "\tgcc -Wall -Werror -Wextra -pedantic -std=gnu89 *.c",
                "",
            ]
        );
    }

    #[test]
    fn no_rules_no_makefile() {
        let project = project(&[C_TAG], vec![c_task("a.c", None), c_task("run", Some("gcc x.c -o x"))]);
        assert_eq!(makefile(&project), None);
    }

    #[test]
    fn header_lists_every_prototype() {
        let mut first = c_task("0-putchar.c", Some("gcc _putchar.c 0-main.c -o 0"));
        first.prototypes = vec!["int _islower(int c);".to_string()];
        let mut second = c_task("1-abs.c", None);
        second.prototypes = vec!["int _abs(int);".to_string()];

        let mut project = project(&[C_TAG], vec![first, second]);
        project.requirements.header = Some("main.h".to_string());

        assert_eq!(
            header_file(&project, "0x02-functions").unwrap(),
            vec![
                "#ifndef MAIN_H",
                "#define MAIN_H",
                "",
                "/*",
                " * File: main.h",
                " * Desc: Header file containing declarations for all functions",
                " *       used in the 0x02-functions directory",
                " */",
                "",
                "int _putchar(char c);",
                "int _islower(int c);",
                "int _abs(int);",
                "",
                "#endif /* MAIN_H */",
                "",
            ]
        );
    }

    #[test]
    fn putchar_needs_exact_token() {
        let with = project(&[C_TAG], vec![c_task("a.c", Some("gcc _putchar.c a.c"))]);
        let without = project(&[C_TAG], vec![c_task("a.c", Some("gcc my_putchar.c a.c"))]);
        assert!(needs_putchar(&with));
        assert!(!needs_putchar(&without));
    }

    #[test]
    fn no_header_declared() {
        assert_eq!(header_file(&project(&[C_TAG], vec![]), "x"), None);
    }

    proptest! {
        #[test]
        fn prop_guard_is_a_valid_macro_name(header in "[a-zA-Z0-9_.\\-]{1,20}\\.h") {
            let guard = include_guard(&header);
            prop_assert_eq!(guard.chars().count(), header.chars().count());
            prop_assert!(guard.ends_with("_H"));
            prop_assert!(guard.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'));
        }
    }
}
