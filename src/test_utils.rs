#![doc(hidden)]

#[cfg(test)]
#[macro_use]
pub mod macros {
    macro_rules! unwrap {
        ($expr:expr) => (match $expr {
            Ok(t) => t,
            Err(e) =>
                panic!("called `unwrap!()` on an `Err` value: {:?}", e)
        })
    }

    macro_rules! assert_err {
        ($expr:expr, $err_pat:pat => $blk:block) => (match $expr {
            Ok(_) => { panic!("unexpected success"); }
            Err($err_pat) => $blk,
            #[allow(unreachable_patterns)]
            Err(e) => { panic!("unexpected error: {:?}", e); }
        })
    }
}

#[cfg(test)]
pub use self::fake::{FakeTransport, Recorded};
