/// Runs a cleanup closure when dropped, on normal exit and on panic alike.
///
/// `main` holds one to restore the terminal (mouse capture, raw mode,
/// alternate screen) however the UI loop ends.
///
/// ```
/// use answer_term::utils::guard::Guard;
///
/// let _guard = Guard::with(|| println!("restored"));
/// ```
pub struct Guard<AtExit: FnOnce()> {
    exit_cb: Option<AtExit>,
}

impl<F: FnOnce()> Guard<F> {
    pub fn with(f: F) -> Self {
        Self { exit_cb: Some(f) }
    }
}

impl<F: FnOnce()> Drop for Guard<F> {
    fn drop(&mut self) {
        if let Some(f) = self.exit_cb.take() {
            f()
        }
    }
}
