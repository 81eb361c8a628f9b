//! Common test helpers and utilities shared across test suite.

use marcline::{Field, Record};

/// Builds a data field from `(name, value)` subfield pairs.
#[allow(dead_code)]
pub fn data_field(name: &str, indicator: &str, subfields: &[(&str, &str)]) -> Field {
    subfields
        .iter()
        .fold(Field::builder(name, indicator), |builder, (code, value)| {
            builder.subfield(*code, *value)
        })
        .build()
}

/// A 30 field danMARC2 record for a Cliff Richard CD.
///
/// Used across the integration tests as a realistic, moderately sized record.
#[allow(dead_code)]
pub fn create_iso_post() -> Record {
    let mut record = Record::new();
    record.implementation_codes = "sse ".to_string();
    record.record_status = "n".to_string();

    let fields: Vec<Field> = vec![
        data_field(
            "001",
            "00",
            &[
                ("a", "2 548 263 8"),
                ("b", "870970"),
                ("c", "20041117025343"),
                ("d", "20041101"),
                ("f", "a"),
                ("t", "FAUST"),
            ],
        ),
        data_field("004", "00", &[("r", "n"), ("a", "e")]),
        data_field("005", "00", &[("h", "e")]),
        data_field(
            "008",
            "00",
            &[
                ("t", "s"),
                ("u", "f"),
                ("a", "2004"),
                ("b", "gb"),
                ("l", "eng"),
                ("v", "0"),
            ],
        ),
        data_field("009", "00", &[("a", "s"), ("g", "xc")]),
        data_field("010", "00", &[("a", "D947837018")]),
        data_field("021", "00", &[("d", "kr. 159,00")]),
        data_field("023", "00", &[("a", "0028947564089")]),
        data_field("032", "00", &[("x", "SFG200447"), ("x", "SFGO200447")]),
        data_field("039", "00", &[("a", "bef")]),
        data_field("100", "00", &[("0", ""), ("a", "Richard"), ("h", "Cliff")]),
        data_field(
            "245",
            "00",
            &[
                ("a", "Something's goin' on"),
                (
                    "e",
                    "Cliff Richard with Steve Mandile, Tommy Sims, JT Corenflos, Michael \
                     Spriggs, Greg Morrow, Nashville String Machine, Tony Harrell, Barry Gibb \
                     ... [et al.]",
                ),
            ],
        ),
        data_field(
            "260",
            "00",
            &[("a", "London"), ("b", "Decca Music Group"), ("c", "p 2004")],
        ),
        data_field("300", "00", &[("n", "1 cd")]),
        data_field("512", "00", &[("a", "Tekster på omslag")]),
        data_field("531", "00", &[("a", "Indhold:")]),
        data_field("538", "00", &[("f", "Decca"), ("g", "4756408")]),
        data_field("652", "00", &[("m", "78.794"), ("v", "5")]),
        data_field(
            "666",
            "00",
            &[
                ("m", "pop"),
                ("m", "rock"),
                ("n", "vokal"),
                ("p", "2000-2009"),
                ("l", "England"),
            ],
        ),
        data_field("700", "00", &[("0", ""), ("a", "Corenflos"), ("h", "J. T.")]),
        data_field("700", "00", &[("0", ""), ("a", "Gibb"), ("h", "Barry")]),
        data_field("700", "00", &[("0", ""), ("a", "Harrell"), ("h", "Tony")]),
        data_field("700", "00", &[("0", ""), ("a", "Lewis"), ("h", "Ken")]),
        data_field("700", "00", &[("0", ""), ("a", "Mandile"), ("h", "Steve")]),
        data_field("700", "00", &[("0", ""), ("a", "Morrow"), ("h", "Greg")]),
        data_field("700", "00", &[("0", ""), ("a", "Sims"), ("h", "Tommy")]),
        data_field("700", "00", &[("0", ""), ("a", "Spriggs"), ("h", "Michael")]),
        data_field("710", "00", &[("0", ""), ("a", "Nashville String Machine")]),
        data_field(
            "795",
            "00",
            &[
                ("å", "11"),
                ("0", ""),
                ("a", "Thousand miles to go"),
                ("a", "Somethin' is goin' on"),
                ("a", "I will not be a mistake"),
                ("a", "Simplicity"),
                ("a", "Sometimes love"),
                ("a", "I cannot give you my love"),
                ("a", "The ¤day that I stop loving you"),
                ("a", "What car"),
                ("a", "How did she get here"),
                ("a", "Field of love"),
                ("a", "For life"),
                ("a", "I don't wanna lose you"),
                ("a", "Faithful one"),
            ],
        ),
        data_field(
            "795",
            "00",
            &[("å", "99"), ("0", ""), ("y", "0"), ("a", "1000 miles to go")],
        ),
    ];
    for field in fields {
        record.append(field);
    }
    record
}

/// The line format rendering of [`create_iso_post`].
#[allow(dead_code)]
pub const ISO_POST_LINES: &str = concat!(
    "001 00 *a 2 548 263 8 *b 870970 *c 20041117025343 *d 20041101 *f a *t FAUST \n",
    "004 00 *r n *a e \n",
    "005 00 *h e \n",
    "008 00 *t s *u f *a 2004 *b gb *l eng *v 0 \n",
    "009 00 *a s *g xc \n",
    "010 00 *a D947837018 \n",
    "021 00 *d kr. 159,00 \n",
    "023 00 *a 0028947564089 \n",
    "032 00 *x SFG200447 *x SFGO200447 \n",
    "039 00 *a bef \n",
    "100 00 *0 *a Richard *h Cliff \n",
    "245 00 *a Something's goin' on *e Cliff Richard with Steve Mandile, Tommy Sims, JT ",
    "Corenflos, Michael Spriggs, Greg Morrow, Nashville String Machine, Tony Harrell, Barry ",
    "Gibb ... [et al.] \n",
    "260 00 *a London *b Decca Music Group *c p 2004 \n",
    "300 00 *n 1 cd \n",
    "512 00 *a Tekster på omslag \n",
    "531 00 *a Indhold: \n",
    "538 00 *f Decca *g 4756408 \n",
    "652 00 *m 78.794 *v 5 \n",
    "666 00 *m pop *m rock *n vokal *p 2000-2009 *l England \n",
    "700 00 *0 *a Corenflos *h J. T. \n",
    "700 00 *0 *a Gibb *h Barry \n",
    "700 00 *0 *a Harrell *h Tony \n",
    "700 00 *0 *a Lewis *h Ken \n",
    "700 00 *0 *a Mandile *h Steve \n",
    "700 00 *0 *a Morrow *h Greg \n",
    "700 00 *0 *a Sims *h Tommy \n",
    "700 00 *0 *a Spriggs *h Michael \n",
    "710 00 *0 *a Nashville String Machine \n",
    "795 00 *å 11 *0 *a Thousand miles to go *a Somethin' is goin' on *a I will not be a ",
    "mistake *a Simplicity *a Sometimes love *a I cannot give you my love *a The ¤day that ",
    "I stop loving you *a What car *a How did she get here *a Field of love *a For life *a ",
    "I don't wanna lose you *a Faithful one \n",
    "795 00 *å 99 *0 *y 0 *a 1000 miles to go \n",
);
