//! Global compiler and linker flags shared by every native module.
//!
//! Flags used by lots of modules are stored as package variables so the
//! generated build rules reference them by name instead of repeating them
//! for every compiled file.

use crate::core::configuration::{BuildConfiguration, HostOs};
use crate::core::flags::FlagSet;
use crate::core::source_tree::SourceTree;
use crate::registry::{reference, RegistryBuilder, RegistryError, VariableRegistry};
use crate::toolchain::overrides::{
    CC_WRAPPER, LLVM_PREBUILTS_BASE, LLVM_PREBUILTS_VERSION, LLVM_RELEASE_VERSION,
};
use crate::toolchain::paths::prefixed_existent_paths;
use crate::toolchain::unsupported::CompilerRules;

/// Namespace the global variables are declared in.
pub const NAMESPACE: &str = "cc/config";

pub const C_STD_VERSION: &str = "gnu99";
pub const CPP_STD_VERSION: &str = "gnu++17";
pub const EXPERIMENTAL_C_STD_VERSION: &str = "gnu11";
pub const EXPERIMENTAL_CPP_STD_VERSION: &str = "gnu++2a";

pub const NDK_MAX_PREBUILT_VERSION: u32 = 27;

/// Default location of the clang prebuilts, relative to the source tree.
pub const CLANG_DEFAULT_BASE: &str = "prebuilts/clang/host";
pub const CLANG_DEFAULT_VERSION: &str = "clang-r353983c";
pub const CLANG_DEFAULT_SHORT_VERSION: &str = "9.0.3";

/// Directories whose Android.bp modules may build with warnings.
pub const WARNING_ALLOWED_PROJECTS: &[&str] = &["device/", "vendor/"];

/// Directories whose Android.mk modules may build with warnings.
pub const WARNING_ALLOWED_OLD_PROJECTS: &[&str] = &[];

/// Flags modules may never set.
pub const ILLEGAL_FLAGS: &[&str] = &["-w"];

/// Appended to the lld flag lists after filtering. Always accepted by lld,
/// so it is deliberately not run through the unsupported-flag filter.
pub const LLD_EXTRA_FLAGS: &str = "-fuse-ld=lld -O2";

const COMMON_GLOBAL_CFLAGS: &[&str] = &[
    "-DANDROID",
    "-fmessage-length=0",
    "-W",
    "-Wall",
    "-Wno-unused",
    "-Winit-self",
    "-Wpointer-arith",
    // Make paths in deps files relative
    "-no-canonical-prefixes",
    "-fno-canonical-system-headers",
    "-DNDEBUG",
    "-UDEBUG",
    "-fno-exceptions",
    "-Wno-multichar",
    "-O2",
    "-g",
    "-fno-strict-aliasing",
];

const DEVICE_GLOBAL_CFLAGS: &[&str] = &[
    "-fdiagnostics-color",
    "-ffunction-sections",
    "-fdata-sections",
    "-fno-short-enums",
    "-funwind-tables",
    "-fstack-protector-strong",
    "-Wa,--noexecstack",
    "-D_FORTIFY_SOURCE=2",
    "-Wstrict-aliasing=2",
    "-Werror=return-type",
    "-Werror=non-virtual-dtor",
    "-Werror=address",
    "-Werror=sequence-point",
    "-Werror=date-time",
    "-Werror=format-security",
];

const DEVICE_GLOBAL_CPPFLAGS: &[&str] = &["-fvisibility-inlines-hidden"];

const DEVICE_GLOBAL_LDFLAGS: &[&str] = &[
    "-Wl,-z,noexecstack",
    "-Wl,-z,relro",
    "-Wl,-z,now",
    "-Wl,--build-id=md5",
    "-Wl,--warn-shared-textrel",
    "-Wl,--fatal-warnings",
    "-Wl,--no-undefined-version",
    "-Wl,--exclude-libs,libgcc.a",
    "-Wl,--exclude-libs,libgcc_stripped.a",
];

const COMMON_GLOBAL_CPPFLAGS: &[&str] = &["-Wsign-promo"];

const NO_OVERRIDE_GLOBAL_CFLAGS: &[&str] = &[
    "-Werror=int-to-pointer-cast",
    "-Werror=pointer-to-int-cast",
];

/// Makes `__FILE__` and debug info paths independent of the checkout location.
const LINUX_DEBUG_PREFIX_MAP: &str = "-fdebug-prefix-map=/proc/self/cwd=";

// Everything in these lists is a crime against abstraction and dependency
// tracking. Do not add anything to them.
const COMMON_GLOBAL_INCLUDES: &[&str] = &[
    "system/core/include",
    "system/media/audio/include",
    "hardware/libhardware/include",
    "hardware/libhardware_legacy/include",
    "hardware/ril/include",
    "frameworks/native/include",
    "frameworks/native/opengl/include",
    "frameworks/av/include",
];

// Used by non-NDK modules to get jni.h.
const COMMON_NATIVEHELPER_INCLUDE: &[&str] = &["libnativehelper/include_jni"];

const RS_GLOBAL_INCLUDES: &[&str] = &[
    "external/clang/lib/Headers",
    "frameworks/rs/script_api/include",
];

/// The global flag lists, assembled for one build OS.
#[derive(Debug, Clone)]
pub struct GlobalFlags {
    pub common_cflags: FlagSet,
    pub common_conlyflags: FlagSet,
    pub common_cppflags: FlagSet,
    pub device_cflags: FlagSet,
    pub device_cppflags: FlagSet,
    pub device_ldflags: FlagSet,
    pub host_cflags: FlagSet,
    pub host_cppflags: FlagSet,
    pub host_ldflags: FlagSet,
    pub no_override_cflags: FlagSet,
}

impl GlobalFlags {
    pub fn new(build_os: HostOs) -> Self {
        let mut common_cflags = FlagSet::from(COMMON_GLOBAL_CFLAGS);
        if build_os == HostOs::Linux {
            common_cflags.push(LINUX_DEBUG_PREFIX_MAP);
        }

        GlobalFlags {
            common_cflags,
            common_conlyflags: FlagSet::new(),
            common_cppflags: FlagSet::from(COMMON_GLOBAL_CPPFLAGS),
            device_cflags: FlagSet::from(DEVICE_GLOBAL_CFLAGS),
            device_cppflags: FlagSet::from(DEVICE_GLOBAL_CPPFLAGS),
            device_ldflags: FlagSet::from(DEVICE_GLOBAL_LDFLAGS),
            host_cflags: FlagSet::new(),
            host_cppflags: FlagSet::new(),
            host_ldflags: FlagSet::new(),
            no_override_cflags: FlagSet::from(NO_OVERRIDE_GLOBAL_CFLAGS),
        }
    }
}

/// Inputs to the declaration phase.
pub struct GlobalsEnv<'a> {
    pub flags: GlobalFlags,
    /// Unsupported-flag rules for the active compiler version
    pub rules: CompilerRules,
    pub source_tree: &'a dyn SourceTree,
}

/// Declare all global toolchain variables into `builder`.
pub fn declare_globals(builder: &mut RegistryBuilder, env: &GlobalsEnv<'_>) -> Result<(), RegistryError> {
    let flags = &env.flags;
    let cflags = &env.rules.cflags;

    builder.declare_static("CommonGlobalConlyflags", flags.common_conlyflags.join())?;
    builder.declare_static("DeviceGlobalCppflags", flags.device_cppflags.join())?;
    builder.declare_static("DeviceGlobalLdflags", flags.device_ldflags.join())?;
    builder.declare_static(
        "DeviceGlobalLldflags",
        env.rules
            .lldflags
            .filter(&flags.device_ldflags)
            .chain([LLD_EXTRA_FLAGS])
            .join(),
    )?;
    builder.declare_static("HostGlobalCppflags", flags.host_cppflags.join())?;
    builder.declare_static("HostGlobalLdflags", flags.host_ldflags.join())?;
    builder.declare_static(
        "HostGlobalLldflags",
        env.rules
            .lldflags
            .filter(&flags.host_ldflags)
            .chain([LLD_EXTRA_FLAGS])
            .join(),
    )?;

    builder.declare_static(
        "CommonClangGlobalCflags",
        cflags
            .filter(&flags.common_cflags)
            .chain([reference("ClangExtraCflags")])
            .join(),
    )?;

    let device_cflags = cflags.filter(&flags.device_cflags);
    builder.declare_lazy("DeviceClangGlobalCflags", move |config| {
        device_clang_cflags(&device_cflags, config)
    })?;

    builder.declare_static(
        "HostClangGlobalCflags",
        cflags.filter(&flags.host_cflags).join(),
    )?;
    builder.declare_static(
        "NoOverrideClangGlobalCflags",
        cflags
            .filter(&flags.no_override_cflags)
            .chain([reference("ClangExtraNoOverrideCflags")])
            .join(),
    )?;
    builder.declare_static(
        "CommonClangGlobalCppflags",
        cflags
            .filter(&flags.common_cppflags)
            .chain([reference("ClangExtraCppflags")])
            .join(),
    )?;
    builder.declare_static("ClangExternalCflags", reference("ClangExtraExternalCflags"))?;

    builder.declare_static(
        "CommonGlobalIncludes",
        prefixed_existent_paths("-I", COMMON_GLOBAL_INCLUDES, env.source_tree),
    )?;
    builder.declare_static(
        "CommonNativehelperInclude",
        prefixed_existent_paths("-I", COMMON_NATIVEHELPER_INCLUDE, env.source_tree),
    )?;

    declare_clang_paths(builder)?;
    declare_renderscript_paths(builder, env.source_tree)?;

    builder.declare_lazy("CcWrapper", |config| CC_WRAPPER.resolve(config, ""))?;
    builder.declare_lazy("HostPrebuiltTag", |config| config.prebuilt_os().to_string())?;

    Ok(())
}

/// Declare the globals into a fresh registry and freeze it.
pub fn global_registry(env: &GlobalsEnv<'_>) -> Result<VariableRegistry, RegistryError> {
    let mut builder = RegistryBuilder::new(NAMESPACE);
    declare_globals(&mut builder, env)?;
    Ok(builder.freeze())
}

/// Device cflags for the active target. The specialized target does not
/// take the extra target cflags.
fn device_clang_cflags(filtered: &FlagSet, config: &dyn BuildConfiguration) -> String {
    if config.is_specialized_target() {
        filtered.join()
    } else {
        filtered
            .clone()
            .chain([reference("ClangExtraTargetCflags")])
            .join()
    }
}

fn declare_clang_paths(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
    builder.declare_source_path("ClangDefaultBase", CLANG_DEFAULT_BASE)?;
    builder.declare_lazy("ClangBase", |config| {
        LLVM_PREBUILTS_BASE.resolve(config, &reference("ClangDefaultBase"))
    })?;
    builder.declare_lazy("ClangVersion", |config| {
        LLVM_PREBUILTS_VERSION.resolve(config, CLANG_DEFAULT_VERSION)
    })?;
    builder.declare_static("ClangPath", "${ClangBase}/${HostPrebuiltTag}/${ClangVersion}")?;
    builder.declare_static("ClangBin", "${ClangPath}/bin")?;
    builder.declare_static("ClangTidyShellPath", "build/soong/scripts/clang-tidy.sh")?;

    builder.declare_lazy("ClangShortVersion", |config| {
        LLVM_RELEASE_VERSION.resolve(config, CLANG_DEFAULT_SHORT_VERSION)
    })?;
    builder.declare_static(
        "ClangAsanLibDir",
        "${ClangBase}/linux-x86/${ClangVersion}/lib64/clang/${ClangShortVersion}/lib/linux",
    )?;
    Ok(())
}

// Tied to the LLVM in external/llvm, so these may trail the host prebuilts
// used by the rest of the build.
fn declare_renderscript_paths(
    builder: &mut RegistryBuilder,
    tree: &dyn SourceTree,
) -> Result<(), RegistryError> {
    builder.declare_source_path("RSClangBase", "prebuilts/clang/host")?;
    builder.declare_source_path("RSClangVersion", "clang-3289846")?;
    builder.declare_source_path("RSReleaseVersion", "3.8")?;
    builder.declare_static(
        "RSLLVMPrebuiltsPath",
        "${RSClangBase}/${HostPrebuiltTag}/${RSClangVersion}/bin",
    )?;
    builder.declare_static(
        "RSIncludePath",
        "${RSLLVMPrebuiltsPath}/../lib64/clang/${RSReleaseVersion}/include",
    )?;
    builder.declare_static(
        "RsGlobalIncludes",
        prefixed_existent_paths("-I", RS_GLOBAL_INCLUDES, tree),
    )?;
    Ok(())
}

/// Whether modules under `dir` may build with warnings enabled.
pub fn is_warning_allowed(dir: &str, old_style: bool) -> bool {
    let projects = if old_style {
        WARNING_ALLOWED_OLD_PROJECTS
    } else {
        WARNING_ALLOWED_PROJECTS
    };
    projects.iter().any(|prefix| dir.starts_with(prefix))
}

pub fn is_illegal_flag(flag: &str) -> bool {
    ILLEGAL_FLAGS.contains(&flag)
}

/// Bionic system include flags for a kernel architecture.
pub fn bionic_headers(kernel_arch: &str) -> String {
    [
        "-isystem bionic/libc/include".to_string(),
        "-isystem bionic/libc/kernel/uapi".to_string(),
        format!("-isystem bionic/libc/kernel/uapi/asm-{}", kernel_arch),
        "-isystem bionic/libc/kernel/android/scsi".to_string(),
        "-isystem bionic/libc/kernel/android/uapi".to_string(),
    ]
    .join(" ")
}
