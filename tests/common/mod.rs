#[macro_export]
macro_rules! tests {
    ($file:ident in $scope:ident is OK $($expected:expr)*) => {
        #[test]
        fn $file() {
            use loxr::error::Host;
            use loxr::Lox;

            let mut expected = vec![$($expected),*];

            // if exists, concat expected lines with new lines
            let expected = match expected.len() {
                0 => "".to_string(),
                _ => {
                    // add empty string to end to add new line to end of output
                    expected.push("");
                    expected.join("\n")
                }
            };

            let host = Host::new();
            let mut output = Vec::new();
            let mut lox = Lox::new(&host, &mut output);

            lox.run_file(&format!("tests/fixtures/{}/{}.lox", stringify!($scope), stringify!($file)));
            assert!(!host.had_error(), "{} raised an unexpected error", stringify!($file));

            // drop lox here to avoid the compiler's drop check error before accessing output
            drop(lox);
            assert_eq!(expected, std::str::from_utf8(&output).unwrap());
        }
    };

    ($file:ident in $scope:ident is ERR $($expected:expr)+) => {
        #[test]
        fn $file() {
            use assert_cmd::Command;
            // output concats expected with new line
            let output = vec![$($expected),+].join("\n");
            let file = format!("tests/fixtures/{}/{}.lox", stringify!($scope), stringify!($file));

            Command::cargo_bin("loxr").unwrap()
                .arg(file)
                .assert()
                .stderr(format!("{output}\n"))
                .failure();
        }
    };
}
