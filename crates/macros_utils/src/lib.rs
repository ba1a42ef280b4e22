#[cfg(feature = "actix")]
pub use actix_web;

/// Generates a `pub fn routes(cfg: &mut ServiceConfig)` for the current module.
///
/// `route name` registers a handler produced by the actix-web route macros,
/// `mod name` pulls in the `routes` function of a child module.
///
/// ```ignore
/// macros_utils::routes! {
///     route health_route,
///     mod history,
/// }
/// ```
#[cfg(feature = "actix")]
#[macro_export]
macro_rules! routes {
    (@register $cfg:ident, route $name:ident) => {
        $cfg.service($name);
    };
    (@register $cfg:ident, mod $name:ident) => {
        $cfg.configure($name::routes);
    };
    ($($kind:tt $name:ident),* $(,)?) => {
        pub fn routes(cfg: &mut $crate::actix_web::web::ServiceConfig) {
            $( $crate::routes!(@register cfg, $kind $name); )*
        }
    };
}
