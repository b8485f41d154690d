// Host platform details needed when naming the compiled executable

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    /// Detect the platform this binary was built for
    pub fn host() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Get the executable file extension for this platform
    pub fn executable_extension(&self) -> &'static str {
        match self {
            Platform::Windows => ".exe",
            Platform::Unix => "",
        }
    }

    /// Executable file name for a program stem, e.g. `prog` or `prog.exe`
    pub fn executable_name(&self, stem: &str) -> String {
        format!("{stem}{}", self.executable_extension())
    }
}
