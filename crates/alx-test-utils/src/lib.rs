//! Testing utilities for the ALX scaffolding workspace
//!
//! Shared feeds, canonical schemas and filesystem helpers.

#![allow(missing_docs)]

use alx_schema::{ProjectSchema, Requirements, TaskSchema, TestFileSpec, C_TAG, GROUP_PROJECT_TAG};
use std::fs;
use std::path::{Path, PathBuf};

/// Crawler feed (array form) for a small C project page
pub const C_PROJECT_FEED: &str = r#"[{
    "title": "0x02. C - Functions, nested loops",
    "tags": ["C", "Functions"],
    "members": [],
    "requirements": [
        "<ul>\n<li>Allowed editors: <code>vi</code>, <code>vim</code>, <code>emacs</code></li>\n<li>A <code>README.md</code> file, at the root of the folder of the project is mandatory</li>\n<li>The prototypes of all your functions and the prototype of the function <code>_putchar</code> should be included in your header file called <code>main.h</code></li>\n</ul>"
    ],
    "tasks": [
        {
            "type": "mandatory",
            "title": "\n      0. _putchar\n    ",
            "body": [
                "<p>Write a program that prints <code>_putchar</code>, followed by a new line.</p>",
                "<pre><code>julien@ubuntu:~/0x02$ cat 0-main.c\n#include &quot;main.h&quot;\n\n/**\n * main - check the code\n *\n * Return: Always 0.\n */\nint main(void)\n{\n    _putchar('_');\n    return (0);\n}\njulien@ubuntu:~/0x02$ gcc -Wall -pedantic -Werror -Wextra -std=gnu89 _putchar.c 0-main.c 0-putchar.c -o 0-putchar\njulien@ubuntu:~/0x02$ ./0-putchar\n_putchar\n</code></pre>"
            ],
            "prototype": [],
            "github_repository": "alx-low_level_programming",
            "directory": "0x02-functions_nested_loops",
            "file": "0-putchar.c"
        },
        {
            "type": "mandatory",
            "title": "1. I sometimes suffer from insomnia",
            "body": [
                "<p>Write a function that prints the alphabet, in lowercase.</p>",
                "<pre><code>julien@ubuntu:~/0x02$ cat 1-main.c\n#include &quot;main.h&quot;\n\nint main(void)\n{\n    print_alphabet();\n    return (0);\n}\njulien@ubuntu:~/0x02$ gcc -Wall -pedantic -Werror -Wextra -std=gnu89 _putchar.c 1-main.c 1-alphabet.c -o 1-alphabet\n</code></pre>"
            ],
            "prototype": ["void print_alphabet(void);"],
            "github_repository": "alx-low_level_programming",
            "directory": "0x02-functions_nested_loops",
            "file": "1-alphabet.c"
        },
        {
            "type": "advanced",
            "title": "2. Is it lowercase",
            "body": ["<p>Returns <code>1</code> if <code>c</code> is lowercase.</p>"],
            "prototype": ["int _islower(int c);"],
            "github_repository": "alx-low_level_programming",
            "directory": "0x02-functions_nested_loops",
            "file": "2-islower.c"
        }
    ]
}]"#;

/// Crawler feed (object form) for a shell group project
pub const GROUP_PROJECT_FEED: &str = r#"{
    "title": "0x16. C - Simple Shell",
    "tags": ["C", "Group project", "Syscall"],
    "members": ["ada LOVELACE", "alan turing"],
    "requirements": ["<ul><li>All your header files should be include guarded</li></ul>"],
    "tasks": [
        {
            "type": "mandatory",
            "title": "0. Betty would be proud",
            "body": ["<p>Write a beautiful code that passes the Betty checks</p>"],
            "github_repository": "simple_shell",
            "directory": null,
            "file": null
        },
        {
            "type": "mandatory",
            "title": "1. Simple shell 0.1",
            "body": ["<pre><code>$ gcc -Wall -Werror -Wextra -pedantic -std=gnu89 *.c -o hsh\n</code></pre>"],
            "github_repository": "simple_shell",
            "directory": null,
            "file": "shell.c, builtins.c"
        }
    ]
}"#;

/// The canonical form of [`C_PROJECT_FEED`]'s essentials
#[must_use]
pub fn c_project() -> ProjectSchema {
    let putchar = TaskSchema {
        kind: Some("mandatory".to_string()),
        files: vec!["0-putchar.c".to_string()],
        test_files: vec![TestFileSpec::new(
            "0-main.c",
            lines(&[
                "#include \"main.h\"",
                "",
                "/**",
                " * main - check the code",
                " *",
                " * Return: Always 0.",
                " */",
                "int main(void)",
                "{",
                "    _putchar('_');",
                "    return (0);",
                "}",
            ]),
        )],
        compilation_command: Some(
            "gcc -Wall -pedantic -Werror -Wextra -std=gnu89 _putchar.c 0-main.c 0-putchar.c -o 0-putchar"
                .to_string(),
        ),
        directory: Some("0x02-functions_nested_loops".to_string()),
        ..TaskSchema::new("0. _putchar")
    };

    let alphabet = TaskSchema {
        kind: Some("mandatory".to_string()),
        description: lines(&["", "Write a function that prints the alphabet, in lowercase.", ""]),
        files: vec!["1-alphabet.c".to_string()],
        prototypes: vec!["void print_alphabet(void);".to_string()],
        test_files: vec![TestFileSpec::new(
            "1-main.c",
            lines(&["#include \"main.h\"", "", "int main(void)", "{", "    print_alphabet();", "    return (0);", "}"]),
        )],
        compilation_command: Some(
            "gcc -Wall -pedantic -Werror -Wextra -std=gnu89 _putchar.c 1-main.c 1-alphabet.c -o 1-alphabet"
                .to_string(),
        ),
        directory: Some("0x02-functions_nested_loops".to_string()),
        ..TaskSchema::new("1. I sometimes suffer from insomnia")
    };

    let islower = TaskSchema {
        kind: Some("advanced".to_string()),
        files: vec!["2-islower.c".to_string()],
        prototypes: vec!["int _islower(int c);".to_string()],
        directory: Some("0x02-functions_nested_loops".to_string()),
        ..TaskSchema::new("2. Is it lowercase")
    };

    ProjectSchema {
        title: "0x02. C - Functions, nested loops".to_string(),
        tags: tags(&[C_TAG, "Functions"]),
        members: Vec::new(),
        directory: "0x02-functions_nested_loops".to_string(),
        requirements: Requirements {
            header: Some("main.h".to_string()),
            readme_required: true,
        },
        tasks: vec![putchar, alphabet, islower],
    }
}

/// A group C project without a header requirement
#[must_use]
pub fn group_project() -> ProjectSchema {
    let shell = TaskSchema {
        files: vec!["shell.c".to_string(), "builtins.c".to_string()],
        github_repository: Some("simple_shell".to_string()),
        compilation_command: Some("gcc -Wall -Werror -Wextra -pedantic -std=gnu89 *.c -o hsh".to_string()),
        ..TaskSchema::new("1. Simple shell 0.1")
    };

    ProjectSchema {
        title: "0x16. C - Simple Shell".to_string(),
        tags: tags(&[C_TAG, GROUP_PROJECT_TAG]),
        members: lines(&["Ada Lovelace", "Alan Turing"]),
        directory: "simple_shell".to_string(),
        tasks: vec![shell],
        ..ProjectSchema::default()
    }
}

/// A project mixing every script language plus unknown and nested files
#[must_use]
pub fn scripts_project() -> ProjectSchema {
    let shell = TaskSchema {
        files: lines(&["0-current_working_directory", "Makefile"]),
        ..TaskSchema::new("0. Where am I?")
    };
    let python = TaskSchema {
        files: lines(&["1-print_list.py", "tests/1-print_list.txt"]),
        prototypes: lines(&["def print_list(my_list=[])"]),
        ..TaskSchema::new("1. Print a list")
    };
    let javascript = TaskSchema {
        files: lines(&["2-arrow.js"]),
        ..TaskSchema::new("2. Arrow functions")
    };

    ProjectSchema {
        title: "Scripts".to_string(),
        directory: "scripts".to_string(),
        tasks: vec![shell, python, javascript],
        ..ProjectSchema::default()
    }
}

/// Own a list of string literals
#[must_use]
pub fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

fn tags(items: &[&str]) -> std::collections::BTreeSet<String> {
    items.iter().map(ToString::to_string).collect()
}

/// Write a feed file into `dir`
pub fn write_feed(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("alx_project.json");
    fs::write(&path, contents).unwrap();
    path
}

/// Fresh temporary directory
pub fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Read a generated file into lines
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .split('\n')
        .map(ToString::to_string)
        .collect()
}

/// Every file below `root`, relative and sorted
pub fn tree(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    collect(root, root, &mut files);
    files.sort();
    files
}

fn collect(root: &Path, dir: &Path, files: &mut Vec<String>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let relative = path.strip_prefix(root).unwrap();
            files.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
}

/// Snapshot of every file's content below `root`
pub fn snapshot(root: &Path) -> Vec<(String, String)> {
    tree(root)
        .into_iter()
        .map(|rel| {
            let content = fs::read_to_string(root.join(&rel)).unwrap();
            (rel, content)
        })
        .collect()
}
