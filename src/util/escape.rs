/*!
Provides convenience routines for displaying raw bytes in error messages.
*/

/// Displays a byte as ASCII, falling back to an escape sequence (like `\xFF`
/// or `\n`) for bytes that aren't printable.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Byte(pub(crate) u8);

impl core::fmt::Display for Byte {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.0 == b' ' {
            return f.write_str(" ");
        }
        for (i, mut b) in core::ascii::escape_default(self.0).enumerate() {
            // capitalize \xab to \xAB
            if i >= 2 && b'a' <= b && b <= b'f' {
                b -= 32;
            }
            write!(f, "{}", char::from(b))?;
        }
        Ok(())
    }
}
