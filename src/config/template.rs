/// Generate the starter rule file written by `cfgmorph --init`.
pub fn generate_init_template() -> String {
	r#"# cfgmorph rule file
#
# Rules run in file order; each rule sees the output of the previous one.
# Every rule needs `active = true` to take effect.

# Stop looking for rule files in parent directories.
root = true

# Skip ~/.cfgmorph.toml when this environment variable is truthy.
# user-config-disable-env-var = "CI"

# Block classes: the tag rules refer to in `blocks`, and the header keyword.
[block-classes.primary]
tag = "Sec.1"
keyword = "interface"

[block-classes.secondary]
tag = "Sec.2"
keyword = "pon-onu-mng"

# Literal replacement in every interface block.
[[rules]]
active = false
blocks = ["Sec.1"]
interface = "all"
type = "replace-text"
from = "shutdown"
to = "no shutdown"

# Regex replacements, applied in order. `regex = true` does the same for
# replace-text. Entries may also be sed-style strings: "s/old/new/g".
[[rules]]
active = false
blocks = ["Sec.1", "Sec.2"]
interface = "all"
type = "replace-batch"
replace_multiple = [
    { from = "vlan (\\d+)", to = "vlan 1$1" },
]

# Insert lines next to a matching line: before, after or after-last.
# Lines already present in the block are not inserted again.
[[rules]]
active = false
blocks = ["Sec.2"]
interface = "gpon-onu_1/1/1:1"
type = "insert-line"
target = "service"
position = "after-last"
new_lines = ["  mvlan 100"]

# Remove every line containing the target.
[[rules]]
active = false
blocks = ["Sec.2"]
interface = "all"
type = "delete-line"
target = "security-mgmt"
"#
	.to_string()
}
