use super::platform::Platform;

/// One archive to fetch: where it lives, what to save it as, and the
/// top-level directory it unpacks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub url: &'static str,
    pub archive: &'static str,
    pub directory: &'static str,
}

// Gzipped tarballs only, so every platform can unpack them without xz support.
pub const BASE_DESCRIPTORS: [Descriptor; 2] = [
    Descriptor {
        url: "https://download.qt.io/archive/qt/5.6/5.6.2/single/qt-everywhere-opensource-src-5.6.2.tar.gz",
        archive: "qt-everywhere-opensource-src-5.6.2.tar.gz",
        directory: "qt-everywhere-opensource-src-5.6.2",
    },
    Descriptor {
        url: "https://download.qt.io/official_releases/qt-installer-framework/2.0.1/qt-installer-framework-opensource-2.0.1-src.tar.gz",
        archive: "qt-installer-framework-opensource-2.0.1-src.tar.gz",
        directory: "qt-installer-framework-opensource-2.0.1-src",
    },
];

pub const ICU_LINUX: Descriptor = Descriptor {
    url: "http://download.icu-project.org/files/icu4c/4.2.1/icu4c-4_2_1-src.tgz",
    archive: "icu4c-4_2_1-src.tgz",
    directory: "icu",
};

pub const ICU_WINDOWS: Descriptor = Descriptor {
    url: "http://download.icu-project.org/files/icu4c/4.8.1.1/icu4c-4_8_1_1-Win32-msvc10.zip",
    archive: "icu4c-4_8_1_1-Win32-msvc10.zip",
    directory: "icu",
};

/// The ICU build required on `platform`, if any. macOS ships its own.
pub fn icu_descriptor(platform: Platform) -> Option<Descriptor> {
    match platform {
        Platform::Linux => Some(ICU_LINUX),
        Platform::Windows => Some(ICU_WINDOWS),
        Platform::MacOs => None,
    }
}

pub fn descriptors_for(platform: Platform) -> Vec<Descriptor> {
    let mut descriptors = BASE_DESCRIPTORS.to_vec();
    descriptors.extend(icu_descriptor(platform));
    descriptors
}
