fn main() {
    glib_build_tools::compile_resources(
        &["resources"],
        "resources/tacknote.gresource.xml",
        "tacknote.gresource",
    );
}
