// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules `use errors::*;` or name the items they need.
use error_chain::error_chain;

error_chain! {

    foreign_links {
        ImageError(::image::ImageError);
        Io(::std::io::Error);
    }

    errors {
        InvalidDimension(width: usize, height: usize) {
            description("invalid maze dimensions")
            display("maze dimensions must be at least 1x1 and fit the grid index type, got {}x{}", width, height)
        }
        InvalidAlgorithmSetting(reason: String) {
            description("invalid algorithm setting")
            display("invalid algorithm setting: {}", reason)
        }
        InvalidRenderSetting(reason: String) {
            description("invalid render setting")
            display("invalid render setting: {}", reason)
        }
        UnreachableConfiguration(reason: String) {
            description("maze cannot satisfy the requested configuration")
            display("unreachable configuration: {}", reason)
        }
    }
}
