//! Fixtures shared by unit tests.

use std::{fs, path::Path};

/// Minimal theme that prints every field it is given.
pub fn write_theme(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("index.html"),
        "<title>{{ title }}</title>{{ head }}{{ content }}\
         <ul>{% for post in posts %}<li data-category=\"{{ post.category }}\">\
         <a href=\"{{ post.link }}\">{{ post.title }}</a> {{ post.date }}\
         {% for a in post.authors %} by {{ a.name }}{% endfor %}</li>{% endfor %}</ul>{{ foot }}",
    )
    .unwrap();
    fs::write(
        dir.join("_default.html"),
        "<title>{{ title }}</title><p class=\"site\">{{ site_title }}</p>{{ head }}\
         <time>{{ date }}</time>{% for a in authors %}<span class=\"author\">{{ a.name }}</span>{% endfor %}\
         {{ content }}{{ foot }}",
    )
    .unwrap();
    fs::write(
        dir.join("subscribe.html"),
        "<p class=\"site\">{{ site_title }}</p><form action=\"{{ form_action }}\"></form>",
    )
    .unwrap();
}

/// Write `content` to `root/rel`, creating parent directories.
pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
