use proptest::prelude::*;

use eorwatch::errors::FilenameError;
use eorwatch::meta::{Category, MetaFilename};

// Producer tokens look like host names: no `_`, no `.`.
fn producer() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9-]{0,20}"
}

// Stream names never contain the `stream` marker or `_`.
fn stream_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z0-9]{0,12}".prop_filter("no marker inside the name", |s| !s.contains("stream"))
}

proptest! {
    #[test]
    fn macro_merger_names_decode(
        run in 0u64..10_000_000,
        lumi in 0u32..10_000,
        stream in stream_name(),
        producer in producer(),
    ) {
        let path = format!("/store/run{run}/run{run}_ls{lumi:04}_stream{stream}_{producer}.jsn");
        let name = MetaFilename::decode(&path).unwrap();
        prop_assert_eq!(name.run, run);
        prop_assert_eq!(name.lumi, lumi);
        prop_assert_eq!(name.stream(), Some(stream.as_str()));
        prop_assert_eq!(&name.producer, &producer);
    }

    #[test]
    fn mini_eor_names_decode(
        run in 0u64..10_000_000,
        lumi in 0u32..10_000,
        producer in producer(),
    ) {
        let name = MetaFilename::decode(format!("run{run:06}_ls{lumi:04}_MiniEoR_{producer}.jsn")).unwrap();
        prop_assert_eq!(name.run, run);
        prop_assert_eq!(&name.category, &Category::MiniEoR);
        prop_assert_eq!(name.stream(), None);
    }

    #[test]
    fn wrong_token_count_is_reported(tokens in proptest::collection::vec("[a-z0-9]{1,6}", 1..8usize)) {
        prop_assume!(tokens.len() != 4);
        let base = format!("{}.jsn", tokens.join("_"));
        prop_assert_eq!(MetaFilename::decode(&base), Err(FilenameError::WrongTokenCount(base.clone())));
    }

    #[test]
    fn non_numeric_run_token_is_reported(junk in "[a-qs-z]{1,5}") {
        let base = format!("run{junk}_ls0001_streamA_host.jsn");
        prop_assert_eq!(MetaFilename::decode(&base), Err(FilenameError::BadRunToken(base.clone())));
    }

    #[test]
    fn decoding_never_panics(s in "\\PC{0,40}") {
        let _ = MetaFilename::decode(&s);
    }
}
