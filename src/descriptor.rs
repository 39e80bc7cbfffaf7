//! Policy checks for `setup.py` packaging descriptors.

pub const DESCRIPTOR_NAME: &str = "setup.py";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PolicyViolation {
    #[error("Package dependencies should be stored in a conda recipe instead of setup.py `install_requires`.")]
    InstallRequires,
    #[error("Missing BSD-3-Clause license in setup.py")]
    MissingLicense,
}

/// Check descriptor text against the packaging policy.
///
/// A non-empty `install_requires` is only reported when
/// `check_install_requires` is set.
pub fn check_descriptor(text: &str, check_install_requires: bool) -> Vec<PolicyViolation> {
    let mut violations = Vec::new();

    if check_install_requires
        && text.contains("install_requires")
        && !text.contains("install_requires=[]")
    {
        violations.push(PolicyViolation::InstallRequires);
    }

    if !text.contains("license='BSD-3-Clause'") && !text.contains("license=\"BSD-3-Clause\"") {
        violations.push(PolicyViolation::MissingLicense);
    }

    violations
}
