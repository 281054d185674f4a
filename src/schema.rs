// Persistent cache tables. The `timestamp` column is exposed as `cached_at`.

diesel::table! {
    genre_cache (video_id) {
        video_id -> Text,
        genre -> Nullable<Text>,
        #[sql_name = "timestamp"]
        cached_at -> BigInt,
    }
}

diesel::table! {
    poster_cache (video_id) {
        video_id -> Text,
        poster_url -> Nullable<Text>,
        backdrop_url -> Nullable<Text>,
        #[sql_name = "timestamp"]
        cached_at -> BigInt,
    }
}

diesel::allow_tables_to_appear_in_same_query!(genre_cache, poster_cache,);
