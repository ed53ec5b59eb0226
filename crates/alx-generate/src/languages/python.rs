//! Python script stubs
//!
//! Prototypes on Python tasks are `def` signatures; each becomes an empty
//! function separated by two blank lines.

use alx_schema::TaskSchema;

const SHEBANG: &str = "#!/usr/bin/python3";

pub(super) fn generate(task: &TaskSchema) -> Vec<String> {
    let mut lines = vec![SHEBANG.to_string()];
    if task.prototypes.is_empty() {
        return lines;
    }

    for prototype in &task.prototypes {
        let signature = prototype.trim_end();
        let signature = if signature.ends_with(':') {
            signature.to_string()
        } else {
            format!("{signature}:")
        };
        lines.extend([String::new(), String::new(), signature, "    pass".to_string()]);
    }
    lines.push(String::new());
    lines
}
