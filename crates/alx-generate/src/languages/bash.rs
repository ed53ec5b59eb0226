//! Shell script stubs

const SHEBANG: &str = "#!/bin/bash";

pub(super) fn generate() -> Vec<String> {
    vec![SHEBANG.to_string(), String::new()]
}
