diesel::table! {
    cache (key) {
        key -> Text,
        value -> Text,
        timestamp -> BigInt,
    }
}
