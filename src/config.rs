/// Every compiled-in constant of the program in one place.
///
/// The demo has no command line or config file; `main` runs with [`Config::default()`]. Tests and
/// embedders can override individual fields with the builder or the [`config!`][crate::config!]
/// macro:
///
/// ```
/// use hello_triangles::{config, Config, ConfigBuilder};
///
/// let config: Config = config! {
///     window_title: String::from("Triangles"),
///     window_size: (1024, 768)
/// };
/// assert_eq!(config.clear_color, Config::default().clear_color);
///
/// let built = ConfigBuilder::default()
///     .window_title("Triangles")
///     .window_size((1024, 768))
///     .build()
///     .unwrap();
/// assert_eq!(built, config);
/// ```
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(default)]
pub struct Config {
    #[builder(setter(into))]
    pub window_title: String,
    /// Size of the window in logical pixels.
    pub window_size: (u32, u32),
    /// Major and minor version of the requested core profile context.
    pub gl_version: (u8, u8),
    /// RGBA color the framebuffer is cleared to every frame.
    pub clear_color: [f32; 4],
    pub resizable: bool,
    pub vsync: bool,
    /// When false (the default) only the vertex stage's compile status is checked. When true the
    /// fragment stage and the program link are validated as well.
    pub validate_all_stages: bool,
}

pub const DEFAULT_TITLE: &str = "LearnOpenGL";
pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (800, 600);
pub const DEFAULT_CLEAR_COLOR: [f32; 4] = [4.0 / 255.0, 217.0 / 255.0, 255.0 / 255.0, 255.0 / 255.0];

impl Default for Config {
    fn default() -> Self {
        Config {
            window_title: DEFAULT_TITLE.to_string(),
            window_size: DEFAULT_WINDOW_SIZE,
            gl_version: (3, 3),
            clear_color: DEFAULT_CLEAR_COLOR,
            resizable: true,
            vsync: true,
            validate_all_stages: false,
        }
    }
}

/// Creates a [`Config`] from the given fields, taking the rest from [`Config::default()`].
#[macro_export]
macro_rules! config {
    {$($k:ident: $v:expr),+ $(,)?} => {
        $crate::Config {
            $($k: $v),+,
            ..::std::default::Default::default()
        }
    };
    {} => {
        <$crate::Config as ::std::default::Default>::default()
    };
}
