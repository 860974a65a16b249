use url::Url;

/// 後台頁面網址：`<admin_base>admin.php?page=<page>&<query...>`
pub fn admin_page_url(admin_base: &str, page: &str, query: &[(&str, &str)]) -> Option<String> {
    let base = if admin_base.ends_with('/') {
        Url::parse(admin_base).ok()?
    } else {
        Url::parse(&format!("{}/", admin_base)).ok()?
    };

    let mut url = base.join("admin.php").ok()?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("page", page);
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }

    Some(url.to_string())
}

/// Appends query arguments to an absolute URL, keeping existing ones.
pub fn add_query_args(base: &str, query: &[(&str, &str)]) -> Option<String> {
    let mut url = Url::parse(base).ok()?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }
    Some(url.to_string())
}

pub fn untrailingslashit(value: &str) -> &str {
    value.trim_end_matches(['/', '\\'])
}
