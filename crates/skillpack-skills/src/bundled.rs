//! Skills compiled into the library

use crate::bundle::EmbeddedSkill;

/// SwiftUI best practices: state, composition, performance, animation and
/// Liquid Glass styling
pub static SWIFTUI_EXPERT: EmbeddedSkill = EmbeddedSkill {
    skill_md: include_str!("../skills/swiftui-expert/SKILL.md"),
    references: &[
        (
            "references/state-management.md",
            include_str!("../skills/swiftui-expert/references/state-management.md"),
        ),
        (
            "references/view-composition.md",
            include_str!("../skills/swiftui-expert/references/view-composition.md"),
        ),
        (
            "references/performance.md",
            include_str!("../skills/swiftui-expert/references/performance.md"),
        ),
        (
            "references/animations.md",
            include_str!("../skills/swiftui-expert/references/animations.md"),
        ),
        (
            "references/liquid-glass.md",
            include_str!("../skills/swiftui-expert/references/liquid-glass.md"),
        ),
    ],
};

/// All bundled skills
pub fn all() -> &'static [&'static EmbeddedSkill] {
    static ALL: [&EmbeddedSkill; 1] = [&SWIFTUI_EXPERT];
    &ALL
}
