/// Takes an enum definition with corresponding integer values and generates a `repr(u8)` enum
/// with a corresponding `parse` function that takes a `u8` and returns its corresponding enum
/// variant. If the byte cannot be matched, `err` is returned.
macro_rules! byte_enum {(
    $(#[$meta:meta])*
    $vis:vis enum $name:ident {
        $($(#[$vmeta:meta])* $variant:ident = $val:expr,)*
    };
    $err:expr
) => {
        $(#[$meta])*
        #[repr(u8)]
        #[derive(Clone, Copy, Debug, Eq, PartialEq)]
        $vis enum $name {
            $($(#[$vmeta])*
            $variant = $val,)*
        }

        impl $name {
            pub(crate) fn parse(byte: u8) -> Self {
                match byte {
                    $($val => Self::$variant,)*
                    _ => $err
                }
            }
        }
    }
}

#[macro_export]
macro_rules! text_frame {
    ($id:expr; $text:expr) => {{
        let mut frame = $crate::frames::TextFrame::new($crate::frames::FrameId::new($id));
        frame.text = String::from($text);
        frame
    }};
}

#[macro_export]
macro_rules! url_frame {
    ($id:expr; $url:expr) => {{
        let mut frame = $crate::frames::UrlFrame::new($crate::frames::FrameId::new($id));
        frame.url = String::from($url);
        frame
    }};
}

/// Parses a frame from `$data` and binds the inner `$variant` body to `$dest`.
#[cfg(test)]
macro_rules! make_frame {
    ($variant:path, $data:expr, $dest:ident) => {
        make_frame!($variant, $data, crate::tag::Version::V24, $dest)
    };

    ($variant:path, $data:expr, $ver:expr, $dest:ident) => {
        let parsed =
            crate::frames::parse($ver, &mut crate::core::io::BufStream::new($data)).unwrap();

        let $dest = if let $variant(body) = parsed.body {
            body
        } else {
            panic!("parsed into an unexpected frame kind");
        };
    };
}

/// Renders `$body` as an ID3v2.4 frame with `$enc` as the tag text encoding and compares
/// it against `$data`.
#[cfg(test)]
macro_rules! assert_render {
    ($body:expr, $enc:expr, $data:expr) => {
        assert_render!($body, crate::tag::Version::V24, $enc, $data)
    };

    ($body:expr, $ver:expr, $enc:expr, $data:expr) => {
        assert_eq!(
            crate::frames::render(&crate::frames::Frame::new($body), $ver, $enc).unwrap(),
            $data
        )
    };
}
